//! Charts module - Closing-price chart rendering

mod renderer;

pub use renderer::{ChartImage, ChartRenderer, RenderError};
