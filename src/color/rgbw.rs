//! Four channel colors
//!
//! The 3-byte wire format has no white channel, so RGBW values are folded
//! back into RGB before they reach the pipeline.

use super::Rgb;

/// Color with a dedicated white channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgbw {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Rgbw {
    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }
}

impl From<Rgb> for Rgbw {
    fn from(value: Rgb) -> Self {
        rgb_to_rgbw(value)
    }
}

impl From<Rgbw> for Rgb {
    fn from(value: Rgbw) -> Self {
        rgbw_to_rgb(value)
    }
}

/// Extract the common white component
///
/// `w = min(r, g, b)` and each color channel keeps only what is left above it,
/// so at least one of `r`, `g`, `b` is zero in the result.
pub const fn rgb_to_rgbw(color: Rgb) -> Rgbw {
    let mut w = color.r;
    if color.g < w {
        w = color.g;
    }
    if color.b < w {
        w = color.b;
    }
    Rgbw {
        r: color.r - w,
        g: color.g - w,
        b: color.b - w,
        w,
    }
}

/// Fold white back into each channel, saturating at 255
pub const fn rgbw_to_rgb(color: Rgbw) -> Rgb {
    Rgb {
        r: color.r.saturating_add(color.w),
        g: color.g.saturating_add(color.w),
        b: color.b.saturating_add(color.w),
    }
}
