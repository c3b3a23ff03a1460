// Plot model for one concurrency mode and its rasterization.

use crate::graph::glyphs::{text_width, GLYPH_HEIGHT};
use crate::graph::raster::{Canvas, BLACK, GRID, WHITE};
use image::{Rgb, RgbImage};

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 480;

const LEFT: i64 = 90;
const RIGHT: i64 = 615;
const TOP: i64 = 50;
const BOTTOM: i64 = 410;
const TEXT_SCALE: u32 = 2;
const MARKER_RADIUS: i64 = 5;
const TICK_LEN: i64 = 6;
const LEGEND_ORIGIN: (i64, i64) = (LEFT + 10, TOP + 10);
const LEGEND_LINE: i64 = (GLYPH_HEIGHT * TEXT_SCALE) as i64 + 8;

/// Series colors, assigned in size order.
pub const PALETTE: [Rgb<u8>; 10] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([127, 127, 127]),
    Rgb([188, 189, 34]),
    Rgb([23, 190, 207]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Scatter plot: one series per workload size against thread count.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Vec<usize>,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<String>, x_ticks: Vec<usize>) -> Self {
        Self {
            title: title.into(),
            x_label: "Num Threads".to_string(),
            y_label: "Speedup".to_string(),
            x_ticks,
            series: Vec::new(),
        }
    }

    /// Append a series; legend order is insertion order.
    pub fn scatter(&mut self, label: impl Into<String>, ys: &[f64]) {
        let points = self.x_ticks.iter().zip(ys).map(|(x, y)| (*x as f64, *y)).collect();
        self.series.push(Series { label: label.into(), points });
    }

    pub fn legend(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn series_color(index: usize) -> Rgb<u8> {
        PALETTE[index % PALETTE.len()]
    }

    pub fn render(&self) -> RgbImage {
        let mut canvas = Canvas::new(WIDTH, HEIGHT, WHITE);
        let axes = Axes::fit(self);

        // horizontal grid and y ticks
        for value in axes.y_ticks() {
            let y = axes.map_y(value);
            canvas.hline(LEFT + 1, RIGHT - 1, y, GRID);
            canvas.hline(LEFT - TICK_LEN, LEFT, y, BLACK);
            let label = axes.format_y(value);
            let w = (text_width(&label) * TEXT_SCALE) as i64;
            let h = (GLYPH_HEIGHT * TEXT_SCALE) as i64;
            canvas.text(LEFT - TICK_LEN - 4 - w, y - h / 2, &label, TEXT_SCALE, BLACK);
        }

        // x ticks exactly at the configured thread counts
        for tick in &self.x_ticks {
            let x = axes.map_x(*tick as f64);
            canvas.vline(x, BOTTOM, BOTTOM + TICK_LEN, BLACK);
            let label = tick.to_string();
            let w = (text_width(&label) * TEXT_SCALE) as i64;
            canvas.text(x - w / 2, BOTTOM + TICK_LEN + 4, &label, TEXT_SCALE, BLACK);
        }

        canvas.outline_rect(LEFT, TOP, RIGHT, BOTTOM, BLACK);

        for (i, series) in self.series.iter().enumerate() {
            let color = Self::series_color(i);
            for (x, y) in &series.points {
                canvas.fill_circle(axes.map_x(*x), axes.map_y(*y), MARKER_RADIUS, color);
            }
        }

        self.draw_labels(&mut canvas);
        self.draw_legend(&mut canvas);
        canvas.into_image()
    }

    fn draw_labels(&self, canvas: &mut Canvas) {
        let h = (GLYPH_HEIGHT * TEXT_SCALE) as i64;
        let center_x = (LEFT + RIGHT) / 2;

        let w = (text_width(&self.title) * TEXT_SCALE) as i64;
        canvas.text(center_x - w / 2, (TOP - h) / 2, &self.title, TEXT_SCALE, BLACK);

        let w = (text_width(&self.x_label) * TEXT_SCALE) as i64;
        canvas.text(center_x - w / 2, HEIGHT as i64 - h - 16, &self.x_label, TEXT_SCALE, BLACK);

        let w = (text_width(&self.y_label) * TEXT_SCALE) as i64;
        let center_y = (TOP + BOTTOM) / 2;
        canvas.text_vertical(12, center_y + w / 2, &self.y_label, TEXT_SCALE, BLACK);
    }

    fn draw_legend(&self, canvas: &mut Canvas) {
        if self.series.is_empty() {
            return;
        }
        let widest = self.series.iter().map(|s| text_width(&s.label)).max().unwrap_or(0);
        let box_w = (widest * TEXT_SCALE) as i64 + 2 * MARKER_RADIUS + 24;
        let box_h = LEGEND_LINE * self.series.len() as i64 + 8;
        let (x0, y0) = LEGEND_ORIGIN;

        canvas.fill_rect(x0, y0, x0 + box_w, y0 + box_h, WHITE);
        canvas.outline_rect(x0, y0, x0 + box_w, y0 + box_h, GRID);

        for (i, series) in self.series.iter().enumerate() {
            let (cx, cy) = Self::legend_marker(i);
            let row_top = cy - (GLYPH_HEIGHT * TEXT_SCALE) as i64 / 2;
            canvas.fill_circle(cx, cy, MARKER_RADIUS, Self::series_color(i));
            canvas.text(cx + MARKER_RADIUS + 8, row_top, &series.label, TEXT_SCALE, BLACK);
        }
    }

    /// Pixel center of the legend marker for the `index`-th series.
    pub fn legend_marker(index: usize) -> (i64, i64) {
        let (x0, y0) = LEGEND_ORIGIN;
        let row_top = y0 + 6 + index as i64 * LEGEND_LINE;
        (x0 + 8 + MARKER_RADIUS, row_top + (GLYPH_HEIGHT * TEXT_SCALE) as i64 / 2)
    }
}

/// Data-to-pixel mapping for one figure.
struct Axes {
    x_min: f64,
    x_max: f64,
    y_max: f64,
    y_step: f64,
}

impl Axes {
    fn fit(figure: &Figure) -> Self {
        let xs = figure.x_ticks.iter().map(|t| *t as f64);
        let lo = xs.clone().fold(f64::INFINITY, f64::min);
        let hi = xs.fold(f64::NEG_INFINITY, f64::max);
        let (lo, hi) = if lo.is_finite() { (lo, hi) } else { (0.0, 1.0) };
        let pad = ((hi - lo) * 0.08).max(0.5);

        let peak = figure
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(_, y)| *y))
            .filter(|y| y.is_finite())
            .fold(0.0f64, f64::max);
        let peak = if peak > 0.0 { peak * 1.05 } else { 1.0 };
        let y_step = nice_step(peak / 5.0);
        let y_max = (peak / y_step).ceil() * y_step;

        Self { x_min: lo - pad, x_max: hi + pad, y_max, y_step }
    }

    fn map_x(&self, x: f64) -> i64 {
        let t = (x - self.x_min) / (self.x_max - self.x_min);
        LEFT + (t * (RIGHT - LEFT) as f64).round() as i64
    }

    fn map_y(&self, y: f64) -> i64 {
        let t = y / self.y_max;
        BOTTOM - (t * (BOTTOM - TOP) as f64).round() as i64
    }

    fn y_ticks(&self) -> Vec<f64> {
        let count = (self.y_max / self.y_step).round() as usize;
        (0..=count).map(|i| i as f64 * self.y_step).collect()
    }

    fn format_y(&self, value: f64) -> String {
        let decimals = if self.y_step >= 1.0 { 0 } else { (-self.y_step.log10().floor()) as usize };
        format!("{:.*}", decimals, value)
    }
}

/// Round a raw tick spacing up to 1, 2 or 5 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let base = 10f64.powf(raw.log10().floor());
    let fraction = raw / base;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}
