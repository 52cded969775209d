//! Screen-space primitives shared by the interpolator, the controller and the
//! presentation layer.

use std::str::FromStr;

use crate::error::{LightboxError, Result};

/// RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Same color with its alpha replaced
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = LightboxError;

    /// Parses a small set of named colors, `#rgb`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || LightboxError::InvalidColor(s.to_string());

        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(Color::BLACK),
            "white" => return Ok(Color::WHITE),
            "transparent" => return Ok(Color::TRANSPARENT),
            "gray" | "grey" => return Ok(Color::from_hex(0x808080)),
            "red" => return Ok(Color::from_hex(0xFF0000)),
            "green" => return Ok(Color::from_hex(0x008000)),
            "blue" => return Ok(Color::from_hex(0x0000FF)),
            _ => {}
        }

        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;

        match hex.len() {
            3 => {
                // #rgb expands each nibble: 0xf -> 0xff
                let expand = |n: u32| ((n & 0xF) * 17) as f32 / 255.0;
                Ok(Color::rgb(expand(value >> 8), expand(value >> 4), expand(value)))
            }
            6 => Ok(Color::from_hex(value)),
            8 => Ok(Color::from_hex(value >> 8).with_alpha((value & 0xFF) as f32 / 255.0)),
            _ => Err(invalid()),
        }
    }
}

/// Axis-aligned rectangle in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-size rectangle sitting on a point
    pub const fn point(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Move the rectangle without resizing it
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Finite coordinates and a non-negative size
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Window metrics the overlay lays itself out against.
///
/// Injected by the owner instead of being queried from the platform, so the
/// same controller can be exercised against any window size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Added to the content's top edge. Negative on platforms where the
    /// overlay is drawn underneath a translucent status bar.
    pub status_bar_offset: f32,
    /// Unsafe area at the top of the window (display notch). The content
    /// loses this much height and the header is pushed below it.
    pub top_inset: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            status_bar_offset: 0.0,
            top_inset: 0.0,
        }
    }

    pub fn with_status_bar_offset(mut self, offset: f32) -> Self {
        self.status_bar_offset = offset;
        self
    }

    pub fn with_top_inset(mut self, inset: f32) -> Self {
        self.top_inset = inset;
        self
    }

    /// The full-window rectangle the content expands to and the backdrop
    /// covers
    pub fn content_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, (self.height - self.top_inset).max(0.0))
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.width,
            self.height,
            self.status_bar_offset,
            self.top_inset,
        ]
        .iter()
        .all(|v| v.is_finite());

        if !finite || self.width <= 0.0 || self.height <= 0.0 || self.top_inset < 0.0 {
            return Err(LightboxError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
