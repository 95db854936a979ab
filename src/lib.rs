//! Crypto Tracker - Cryptocurrency Price History Fetcher & Chart Viewer
//!
//! Pick a coin, pull a month of daily prices from Yahoo Finance, save them as
//! CSV and look at the closing prices in a chart window.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod session;
