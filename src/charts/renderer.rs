//! Static Chart Renderer
//! Draws the closing-price line chart with plotters into an in-memory PNG,
//! then decodes and fits it to the display bound.
//!
//! Layout:
//! 1. Title: "{label} Closing Prices" centered
//! 2. Blue line through the closes with a circle on every day
//! 3. Grid, "Date" on the x axis, "Closing Price (USD)" on the y axis

use crate::config::ChartConfig;
use crate::data::PriceSeries;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const LINE_COLOR: RGBColor = BLUE;
const MARKER_RADIUS: i32 = 4;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("nothing to plot")]
    EmptySeries,
    #[error("{0}")]
    Plot(String),
    #[error("{0}")]
    Image(#[from] image::ImageError),
}

/// A chart ready to be shown in a window.
#[derive(Clone)]
pub struct ChartImage {
    pub title: String,
    pub window_title: String,
    pub image: RgbaImage,
}

impl ChartImage {
    pub fn size(&self) -> [usize; 2] {
        [self.image.width() as usize, self.image.height() as usize]
    }
}

pub struct ChartRenderer;

impl ChartRenderer {
    pub fn chart_title(label: &str) -> String {
        format!("{} Closing Prices", label)
    }

    pub fn window_title(label: &str) -> String {
        format!("{} Graph", label)
    }

    /// Render, encode, decode and fit in one go.
    pub fn render(
        series: &PriceSeries,
        label: &str,
        config: &ChartConfig,
    ) -> Result<ChartImage, RenderError> {
        let title = Self::chart_title(label);
        let png = Self::render_to_png_bytes(series, &title, config.width, config.height)?;
        let image = Self::fit_to_bounds(&png, config.display_max_width, config.display_max_height)?;

        log::debug!(
            "rendered {} ({} points) at {}x{}",
            title,
            series.len(),
            image.width(),
            image.height()
        );

        Ok(ChartImage {
            title,
            window_title: Self::window_title(label),
            image,
        })
    }

    /// Draw the close line into a PNG byte buffer.
    pub fn render_to_png_bytes(
        series: &PriceSeries,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
            return Err(RenderError::EmptySeries);
        };
        let (y_min, y_max) = Self::get_y_range(series);

        // One day of slack on each side keeps edge markers (and single-day
        // series) inside the plot area.
        let x_min = Self::to_datetime(first) - Duration::days(1);
        let x_max = Self::to_datetime(last) + Duration::days(1);

        let points: Vec<(DateTime<Utc>, f64)> = series
            .closes()
            .map(|(date, close)| (Self::to_datetime(date), close))
            .collect();

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(Self::plot_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 28.0).into_font())
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(80)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(Self::plot_err)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc("Closing Price (USD)")
                .axis_desc_style(("sans-serif", 20.0).into_font())
                .x_label_formatter(&|dt: &DateTime<Utc>| dt.format("%Y-%m-%d").to_string())
                .y_label_formatter(&|v: &f64| format!("{:.2}", v))
                .draw()
                .map_err(Self::plot_err)?;

            chart
                .draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(2)))
                .map_err(Self::plot_err)?;

            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&point| Circle::new(point, MARKER_RADIUS, LINE_COLOR.filled())),
                )
                .map_err(Self::plot_err)?;

            root.present().map_err(Self::plot_err)?;
        }

        let rgb = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Plot("bitmap size mismatch".to_string()))?;

        let mut png = Vec::new();
        DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Decode PNG bytes and shrink to fit within `max_width` x `max_height`,
    /// keeping the aspect ratio. Smaller images are left as they are.
    pub fn fit_to_bounds(
        png: &[u8],
        max_width: u32,
        max_height: u32,
    ) -> Result<RgbaImage, RenderError> {
        let img = image::load_from_memory_with_format(png, ImageFormat::Png)?;
        let img = if img.width() > max_width || img.height() > max_height {
            img.thumbnail(max_width, max_height)
        } else {
            img
        };
        Ok(img.to_rgba8())
    }

    fn get_y_range(series: &PriceSeries) -> (f64, f64) {
        let Some((min, max)) = series.close_range() else {
            return (0.0, 1.0);
        };
        let span = max - min;
        let pad = if span > 0.0 {
            span * 0.1
        } else {
            (max.abs() * 0.05).max(1e-8)
        };
        (min - pad, max + pad)
    }

    fn to_datetime(date: NaiveDate) -> DateTime<Utc> {
        date.and_time(NaiveTime::default()).and_utc()
    }

    fn plot_err<E: std::fmt::Display>(e: E) -> RenderError {
        RenderError::Plot(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::series::tests::bar;

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        png
    }

    #[test]
    fn titles_follow_the_label() {
        assert_eq!(ChartRenderer::chart_title("Bitcoin"), "Bitcoin Closing Prices");
        assert_eq!(ChartRenderer::window_title("Bitcoin"), "Bitcoin Graph");
    }

    #[test]
    fn line_and_markers_are_blue() {
        assert_eq!(LINE_COLOR.rgb(), (0, 0, 255));
    }

    #[test]
    fn large_figure_is_shrunk_to_bounds() {
        let img = ChartRenderer::fit_to_bounds(&png_of(1000, 500), 800, 400).unwrap();
        assert_eq!((img.width(), img.height()), (800, 400));
    }

    #[test]
    fn aspect_ratio_is_kept() {
        let img = ChartRenderer::fit_to_bounds(&png_of(1000, 1000), 800, 400).unwrap();
        assert_eq!((img.width(), img.height()), (400, 400));
    }

    #[test]
    fn small_figure_is_not_enlarged() {
        let img = ChartRenderer::fit_to_bounds(&png_of(300, 120), 800, 400).unwrap();
        assert_eq!((img.width(), img.height()), (300, 120));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = ChartRenderer::fit_to_bounds(b"not a png", 800, 400).unwrap_err();
        assert!(matches!(err, RenderError::Image(_)));
    }

    #[test]
    fn empty_series_is_rejected_before_drawing() {
        let series = PriceSeries::new("BTC-USD", vec![]);
        let err = ChartRenderer::render_to_png_bytes(&series, "x", 100, 50).unwrap_err();
        assert!(matches!(err, RenderError::EmptySeries));
    }

    #[test]
    fn flat_series_gets_a_non_empty_y_range() {
        let series = PriceSeries::new("BTC-USD", vec![bar(1, 50.0), bar(2, 50.0)]);
        let (lo, hi) = ChartRenderer::get_y_range(&series);
        assert!(lo < 50.0 && hi > 50.0);
    }
}
