//! Brightness scaling
//!
//! Scales each channel by `floor(c * brightness / 255)`. Full brightness is
//! passed through untouched.

use super::Filter;
use crate::{color::Rgb, math8::scale8};

#[derive(Debug, Clone, Copy)]
pub(crate) struct BrightnessFilter {
    /// Scale factor (0-255 = 0.0-1.0)
    level: u8,
}

impl BrightnessFilter {
    pub(crate) const fn new(level: u8) -> Self {
        Self { level }
    }
}

impl Filter for BrightnessFilter {
    fn apply(&self, color: Rgb) -> Rgb {
        match self.level {
            255 => color,
            0 => Rgb { r: 0, g: 0, b: 0 },
            level => Rgb {
                r: scale8(color.r, level),
                g: scale8(color.g, level),
                b: scale8(color.b, level),
            },
        }
    }
}
