// Drawing primitives on an RGB canvas. Out-of-bounds pixels are clipped.

use crate::graph::glyphs::{glyph, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use image::{Rgb, RgbImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GRID: Rgb<u8> = Rgb([225, 225, 225]);

pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self { image: RgbImage::from_pixel(width, height, background) }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    pub fn hline(&mut self, x0: i64, x1: i64, y: i64, color: Rgb<u8>) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.put(x, y, color);
        }
    }

    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.put(x, y, color);
        }
    }

    pub fn outline_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        self.hline(x0, x1, y0, color);
        self.hline(x0, x1, y1, color);
        self.vline(x0, y0, y1, color);
        self.vline(x1, y0, y1, color);
    }

    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.hline(x0, x1, y, color);
        }
    }

    pub fn fill_circle(&mut self, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Horizontal text with its top-left corner at (x, y).
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        self.draw_glyphs(text, scale, color, |tx, ty| (x + tx, y + ty));
    }

    /// Text rotated a quarter turn counter-clockwise, reading bottom to top,
    /// with the bottom-left corner of its box at (x, y).
    pub fn text_vertical(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        self.draw_glyphs(text, scale, color, |tx, ty| (x + ty, y - tx));
    }

    fn draw_glyphs<F>(&mut self, text: &str, scale: u32, color: Rgb<u8>, place: F)
    where
        F: Fn(i64, i64) -> (i64, i64),
    {
        let scale = scale.max(1) as i64;
        for (i, c) in text.chars().enumerate() {
            let rows = glyph(c);
            let origin = i as i64 * ADVANCE as i64;
            for (gy, row) in rows.iter().enumerate().take(GLYPH_HEIGHT as usize) {
                for gx in 0..GLYPH_WIDTH {
                    if row & (1 << (GLYPH_WIDTH - 1 - gx)) == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let tx = (origin + gx as i64) * scale + sx;
                            let ty = gy as i64 * scale + sy;
                            let (px, py) = place(tx, ty);
                            self.put(px, py, color);
                        }
                    }
                }
            }
        }
    }
}
