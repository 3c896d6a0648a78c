//! Bar chart rendering.
//!
//! One vertical bar per sample, in result order. Unreachable samples are
//! drawn at a finite cap height (see [`unreachable_cap`]) in a hatched
//! crimson and tagged `N/A`, so they never stretch the axis to infinity.

#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

use crate::dns::types::{Latency, ResultSet};
use crate::error::Result;
use crate::report::font::{draw_text, draw_text_up, fill_rect, text_height, text_width};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 600;

/// Unreachable bars are drawn this much taller than the slowest answer.
pub const UNREACHABLE_CAP_FACTOR: f64 = 1.2;

/// Height of unreachable bars when no target answered.
pub const UNREACHABLE_FALLBACK_MS: f64 = 100.0;

const TITLE: &str = "DNS Server Performances";
const X_LABEL: &str = "DNS Servers";
const Y_LABEL: &str = "Ping Times (ms)";
const NO_DATA: &str = "No data";
const UNREACHABLE_TAG: &str = "N/A";

/// Labels longer than this are cut and end in `..`.
const MAX_LABEL_CHARS: usize = 16;

const TITLE_SCALE: u32 = 3;
const LABEL_SCALE: u32 = 2;
const TICK_SCALE: u32 = 1;

const MARGIN_TOP: u32 = 56;
const MARGIN_LEFT: u32 = 88;
const MARGIN_RIGHT: u32 = 24;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([33, 33, 33]);
const GRID: Rgb<u8> = Rgb([200, 200, 200]);
const BAR: Rgb<u8> = Rgb([65, 105, 225]);
const UNREACHABLE_BAR: Rgb<u8> = Rgb([220, 20, 60]);
const UNREACHABLE_HATCH: Rgb<u8> = Rgb([139, 0, 0]);

/// A bar ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    /// Plotted height in milliseconds
    pub value_ms: f64,
    pub unreachable: bool,
}

/// Height given to unreachable bars.
///
/// `max reachable latency × 1.2`, or [`UNREACHABLE_FALLBACK_MS`] when no
/// target answered with a positive latency.
#[must_use]
pub fn unreachable_cap(results: &ResultSet) -> f64 {
    results
        .max_reachable()
        .filter(|max| *max > 0.0)
        .map_or(UNREACHABLE_FALLBACK_MS, |max| max * UNREACHABLE_CAP_FACTOR)
}

/// Resolve every sample to a finite bar.
#[must_use]
pub fn bars(results: &ResultSet) -> Vec<Bar> {
    let cap = unreachable_cap(results);
    results
        .iter()
        .map(|sample| match sample.latency {
            Latency::Reachable(ms) => Bar {
                label: sample.server.name.clone(),
                value_ms: ms,
                unreachable: false,
            },
            Latency::Unreachable => Bar {
                label: sample.server.name.clone(),
                value_ms: cap,
                unreachable: true,
            },
        })
        .collect()
}

/// Render the result set as PNG bytes.
///
/// # Errors
///
/// Returns `Error::Render` if PNG encoding fails.
pub fn render_chart(results: &ResultSet) -> Result<Vec<u8>> {
    ChartRenderer::default().render(results)
}

/// Bar chart renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
        }
    }
}

impl ChartRenderer {
    /// Renderer for a custom canvas size. Sizes below 320×240 are raised to it.
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width: width.max(320),
            height: height.max(240),
        }
    }

    /// Draw and encode the chart.
    ///
    /// # Errors
    ///
    /// Returns `Error::Render` if PNG encoding fails.
    pub fn render(&self, results: &ResultSet) -> Result<Vec<u8>> {
        let image = self.draw(results);
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png)?;
        tracing::debug!(
            "Encoded {}x{} chart ({} bytes)",
            self.width,
            self.height,
            png.get_ref().len()
        );
        Ok(png.into_inner())
    }

    /// Draw the chart into a raw image.
    #[must_use]
    pub fn draw(&self, results: &ResultSet) -> RgbImage {
        let bars = bars(results);
        let plot = self.plot_area(&bars);
        let mut image = RgbImage::from_pixel(self.width, self.height, BACKGROUND);

        self.draw_frame(&mut image, &plot);

        if bars.is_empty() {
            let x = plot.left + plot.width().saturating_sub(text_width(NO_DATA, LABEL_SCALE)) / 2;
            let y = plot.top + plot.height().saturating_sub(text_height(LABEL_SCALE)) / 2;
            draw_text(&mut image, i64::from(x), i64::from(y), NO_DATA, LABEL_SCALE, INK);
            return image;
        }

        for (index, bar) in bars.iter().enumerate() {
            draw_bar(&mut image, &plot, index, bars.len(), bar);
        }
        image
    }

    fn plot_area(&self, bars: &[Bar]) -> Plot {
        let longest = bars
            .iter()
            .map(|bar| short_label(&bar.label).chars().count())
            .max()
            .unwrap_or(0);
        let label_px = text_width(&"M".repeat(longest), LABEL_SCALE);
        let x_title_px = text_height(LABEL_SCALE) + 16;
        let bottom_margin = (label_px + x_title_px + 16).min(self.height / 2);

        let max = bars.iter().map(|bar| bar.value_ms).fold(0.0, f64::max);
        let step = tick_step(max);
        let y_max = if max > 0.0 {
            (max / step).ceil() * step
        } else {
            step * 5.0
        };

        Plot {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            right: self.width - MARGIN_RIGHT,
            bottom: self.height - bottom_margin,
            y_max,
            step,
        }
    }

    fn draw_frame(&self, image: &mut RgbImage, plot: &Plot) {
        let title_x = self.width.saturating_sub(text_width(TITLE, TITLE_SCALE)) / 2;
        draw_text(image, i64::from(title_x), 16, TITLE, TITLE_SCALE, INK);

        // Dashed grid lines with tick labels.
        let ticks = (plot.y_max / plot.step).round() as u32;
        let decimals = tick_decimals(plot.step);
        for tick in 0..=ticks {
            let value = plot.step * f64::from(tick);
            let y = plot.y_for(value);
            if tick > 0 {
                for x in (plot.left..plot.right).filter(|x| (x - plot.left) % 8 < 4) {
                    image.put_pixel(x, y, GRID);
                }
            }
            let text = format!("{value:.decimals$}");
            let x = plot.left.saturating_sub(text_width(&text, TICK_SCALE) + 6);
            let y_text = i64::from(y) - i64::from(text_height(TICK_SCALE) / 2);
            draw_text(image, i64::from(x), y_text, &text, TICK_SCALE, INK);
            fill_rect(image, i64::from(plot.left) - 4, i64::from(y), 4, 1, INK);
        }

        // Axes.
        fill_rect(image, i64::from(plot.left), i64::from(plot.top), 1, plot.height() + 1, INK);
        fill_rect(image, i64::from(plot.left), i64::from(plot.bottom), plot.width(), 1, INK);

        let y_label_len = text_width(Y_LABEL, LABEL_SCALE);
        let y_label_bottom = plot.top + (plot.height() + y_label_len) / 2;
        draw_text_up(image, 14, i64::from(y_label_bottom), Y_LABEL, LABEL_SCALE, INK);

        let x_label_x = plot.left + plot.width().saturating_sub(text_width(X_LABEL, LABEL_SCALE)) / 2;
        let x_label_y = self.height - text_height(LABEL_SCALE) - 10;
        draw_text(image, i64::from(x_label_x), i64::from(x_label_y), X_LABEL, LABEL_SCALE, INK);
    }
}

/// Drawing area between the axes.
#[derive(Debug, Clone, Copy)]
struct Plot {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
    y_max: f64,
    step: f64,
}

impl Plot {
    fn width(&self) -> u32 {
        self.right - self.left
    }

    fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Pixel row for a value on the y axis.
    fn y_for(&self, value: f64) -> u32 {
        let fraction = (value / self.y_max).clamp(0.0, 1.0);
        self.bottom - (fraction * f64::from(self.height())).round() as u32
    }

    /// Horizontal extent `[start, end)` of bar `index` out of `count`.
    fn bar_span(&self, index: usize, count: usize) -> (u32, u32) {
        let slot = f64::from(self.width()) / count as f64;
        let center = f64::from(self.left) + slot * (index as f64 + 0.5);
        let half = (slot * 0.3).max(1.0);
        ((center - half).round() as u32, (center + half).round() as u32)
    }
}

fn draw_bar(image: &mut RgbImage, plot: &Plot, index: usize, count: usize, bar: &Bar) {
    let (start, end) = plot.bar_span(index, count);
    let top = plot.y_for(bar.value_ms);
    let center = (start + end) / 2;

    for y in top..plot.bottom {
        for x in start..end {
            let color = if !bar.unreachable {
                BAR
            } else if (x + y) % 10 < 3 {
                UNREACHABLE_HATCH
            } else {
                UNREACHABLE_BAR
            };
            image.put_pixel(x, y, color);
        }
    }

    let tag = if bar.unreachable {
        UNREACHABLE_TAG.to_string()
    } else {
        format!("{:.1}", bar.value_ms)
    };
    let tag_x = i64::from(center) - i64::from(text_width(&tag, TICK_SCALE) / 2);
    let tag_y = i64::from(top) - i64::from(text_height(TICK_SCALE)) - 4;
    draw_text(image, tag_x, tag_y, &tag, TICK_SCALE, INK);

    let label = short_label(&bar.label);
    let label_x = i64::from(center) - i64::from(text_height(LABEL_SCALE) / 2);
    let label_y = i64::from(plot.bottom + 8 + text_width(&label, LABEL_SCALE));
    draw_text_up(image, label_x, label_y, &label, LABEL_SCALE, INK);
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 2).collect();
        format!("{head}..")
    }
}

/// Grid spacing of 1, 2 or 5 times a power of ten giving about five lines.
fn tick_step(max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 1.0;
    }
    let raw = max / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

fn tick_decimals(step: f64) -> usize {
    if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    }
}
