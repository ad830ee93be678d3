mod rgbw;

pub mod gamma;

pub use rgbw::{Rgbw, rgb_to_rgbw, rgbw_to_rgb};
use smart_leds::RGB8;

pub type Rgb = RGB8;

pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const YELLOW: Rgb = Rgb { r: 255, g: 255, b: 0 };
pub const CYAN: Rgb = Rgb { r: 0, g: 255, b: 255 };
pub const MAGENTA: Rgb = Rgb { r: 255, g: 0, b: 255 };

/// Perceived brightness of a color (Rec. 601 weights, integer math)
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn luma(color: Rgb) -> u8 {
    ((color.r as u16 * 30 + color.g as u16 * 59 + color.b as u16 * 11) / 100) as u8
}
