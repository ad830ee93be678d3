//! Strip facade
//!
//! [`LedStrip`] puts the color pipeline in front of a [`StripDriver`]. Pixel
//! setters only touch the buffer; [`LedStrip::fill`] and [`LedStrip::clear`]
//! write and show in one step.

use embassy_time::Duration;
use smart_leds::SmartLedsWrite;

use crate::channel::ChannelProvider;
use crate::color::{BLACK, Rgb, Rgbw, rgbw_to_rgb};
use crate::driver::{DriverConfig, StripDriver, TxState};
use crate::error::Error;
use crate::pipeline::{self, ChannelOrder, PipelineConfig, PipelineSettings};

/// Configuration for a strip
#[derive(Debug, Clone, Copy)]
pub struct StripConfig {
    pub driver: DriverConfig,
    pub pipeline: PipelineConfig,
}

impl StripConfig {
    /// WS2812 strip with GRB order, full brightness and no gamma
    pub const fn new(length: usize, pin: u8) -> Self {
        Self {
            driver: DriverConfig::new(length, pin),
            pipeline: PipelineConfig::new(ChannelOrder::Grb),
        }
    }

    #[must_use]
    pub const fn with_order(mut self, order: ChannelOrder) -> Self {
        self.pipeline.order = order;
        self
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.pipeline.brightness = brightness;
        self
    }

    #[must_use]
    pub const fn with_gamma(mut self, enabled: bool) -> Self {
        self.pipeline.gamma = enabled;
        self
    }
}

/// Addressable LED strip
pub struct LedStrip<P: ChannelProvider, const MAX_LEDS: usize> {
    driver: StripDriver<P, MAX_LEDS>,
    pipeline: PipelineConfig,
}

impl<P: ChannelProvider, const MAX_LEDS: usize> LedStrip<P, MAX_LEDS> {
    /// Create a strip, acquiring its channel from `provider`
    ///
    /// See [`StripDriver::init`] for keeping the provider across a failure.
    pub fn init(provider: P, config: &StripConfig) -> Result<Self, Error> {
        let driver = StripDriver::init(provider, &config.driver)?;
        Ok(Self {
            driver,
            pipeline: config.pipeline,
        })
    }

    /// Release the channel and buffer, a second call does nothing
    pub fn free(&mut self) -> Result<(), Error> {
        self.driver.free()
    }

    /// Set one pixel in the buffer
    pub fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), Error> {
        let bytes = pipeline::transform(&*self, color);
        self.driver.write_pixel(index, bytes)
    }

    /// Set one pixel from an RGBW color, white folded into each channel
    pub fn set_pixel_rgbw(&mut self, index: usize, color: Rgbw) -> Result<(), Error> {
        self.set_pixel(index, rgbw_to_rgb(color))
    }

    /// Set `len` pixels starting at `start` in the buffer
    pub fn set_range(&mut self, start: usize, len: usize, color: Rgb) -> Result<(), Error> {
        let bytes = pipeline::transform(&*self, color);
        self.driver.write_range(start, len, bytes)
    }

    /// Set every pixel to `color` and show it
    pub fn fill(&mut self, color: Rgb) -> Result<(), Error> {
        let bytes = pipeline::transform(&*self, color);
        self.driver.fill(bytes)?;
        self.driver.refresh()
    }

    /// Turn every pixel off and show it
    pub fn clear(&mut self) -> Result<(), Error> {
        self.fill(BLACK)
    }

    /// Send the buffer and wait until it is latched
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.driver.refresh()
    }

    /// Send the buffer without waiting
    ///
    /// While the frame is in flight the hardware is still reading the buffer.
    /// Check [`LedStrip::is_busy`] before writing pixels or submitting again.
    pub fn refresh_async(&mut self) -> Result<(), Error> {
        self.driver.refresh_async()
    }

    pub fn is_busy(&mut self) -> bool {
        self.driver.is_busy()
    }

    /// Wait for an in-flight frame to finish
    pub fn wait(&mut self, timeout: Option<Duration>) -> Result<(), Error> {
        self.driver.wait(timeout)
    }

    /// Brightness applied to pixels written from now on
    pub fn set_brightness(&mut self, level: u8) {
        self.pipeline.brightness = level;
    }

    /// Toggle gamma correction for pixels written from now on
    pub fn enable_gamma(&mut self, enable: bool) {
        self.pipeline.gamma = enable;
    }

    /// Stored wire bytes of one pixel
    pub fn raw_pixel(&self, index: usize) -> Result<[u8; 3], Error> {
        self.driver.pixel(index)
    }

    /// Stored wire bytes of the whole strip
    pub fn raw_buffer(&self) -> &[u8] {
        self.driver.buffer()
    }

    pub const fn len(&self) -> usize {
        self.driver.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.driver.is_empty()
    }

    pub const fn state(&self) -> TxState {
        self.driver.state()
    }

    pub const fn driver(&self) -> &StripDriver<P, MAX_LEDS> {
        &self.driver
    }

    /// Transmit side, for raw wire-byte writes that skip the pipeline
    pub fn driver_mut(&mut self) -> &mut StripDriver<P, MAX_LEDS> {
        &mut self.driver
    }
}

impl<P: ChannelProvider, const MAX_LEDS: usize> PipelineSettings for LedStrip<P, MAX_LEDS> {
    fn order(&self) -> ChannelOrder {
        self.pipeline.order
    }

    fn brightness(&self) -> u8 {
        self.pipeline.brightness
    }

    fn gamma_enabled(&self) -> bool {
        self.pipeline.gamma
    }
}

impl<P: ChannelProvider, const MAX_LEDS: usize> SmartLedsWrite for LedStrip<P, MAX_LEDS> {
    type Error = Error;
    type Color = Rgb;

    /// Write colors from the first pixel on and show them
    ///
    /// Colors past the end of the strip are ignored.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let length = self.len();
        for (index, color) in iterator.into_iter().take(length).enumerate() {
            self.set_pixel(index, color.into())?;
        }
        self.refresh()
    }
}
