//! Color pipeline
//!
//! Turns an application color into the three wire bytes stored in the strip
//! buffer. The stages always run in the same order, because gamma and
//! brightness do not commute:
//!
//! 1. gamma correction (when enabled)
//! 2. brightness scaling
//! 3. reordering into the strip's channel order

mod brightness;
mod gamma;
mod order;

use crate::color::Rgb;

use brightness::BrightnessFilter;
use gamma::GammaFilter;
pub use order::ChannelOrder;

pub(crate) trait Filter {
    /// Apply the filter to a single color
    fn apply(&self, color: Rgb) -> Rgb;
}

/// Read-only view of the settings the pipeline depends on
pub trait PipelineSettings {
    /// Wire order of the strip
    fn order(&self) -> ChannelOrder;
    /// Brightness scale (0-255 = 0.0-1.0)
    fn brightness(&self) -> u8;
    /// Whether gamma correction is applied
    fn gamma_enabled(&self) -> bool;
}

/// Pipeline settings owned by a single strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub order: ChannelOrder,
    pub brightness: u8,
    pub gamma: bool,
}

impl PipelineConfig {
    pub const fn new(order: ChannelOrder) -> Self {
        Self {
            order,
            brightness: 255,
            gamma: false,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(ChannelOrder::default())
    }
}

impl PipelineSettings for PipelineConfig {
    fn order(&self) -> ChannelOrder {
        self.order
    }

    fn brightness(&self) -> u8 {
        self.brightness
    }

    fn gamma_enabled(&self) -> bool {
        self.gamma
    }
}

/// Run gamma and brightness, keeping the logical RGB layout
pub fn correct<S: PipelineSettings + ?Sized>(settings: &S, color: Rgb) -> Rgb {
    let color = GammaFilter::new(settings.gamma_enabled()).apply(color);
    BrightnessFilter::new(settings.brightness()).apply(color)
}

/// Run the full pipeline and return the bytes in wire order
pub fn transform<S: PipelineSettings + ?Sized>(settings: &S, color: Rgb) -> [u8; 3] {
    settings.order().arrange(correct(settings, color))
}
