//! Report module.
//!
//! This module turns a result set into the deliverable:
//! - A PNG bar chart drawn with a small built-in bitmap font
//! - A self-contained HTML document embedding that chart

pub mod chart;
pub mod font;
pub mod html;

pub use chart::{render_chart, ChartRenderer};
pub use html::{render_report, ReportRenderer};
