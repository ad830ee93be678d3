//! Transmission lifecycle
//!
//! [`StripDriver`] owns the raw pixel buffer and the transmit channel. The
//! buffer holds bytes that already went through the color pipeline, three per
//! pixel in the strip's wire order; the driver only encodes and ships them.
//!
//! States: `Ready -> Transmitting -> Ready`, and `Freed` once [`StripDriver::free`]
//! ran. A failed [`StripDriver::init`] never yields a driver, so nothing has
//! to be cleaned up by the caller.

use embassy_time::{Duration, block_for};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::channel::{ChannelConfig, ChannelError, ChannelProvider};
use crate::error::{ArgumentError, Error};
use crate::protocol::{Encoder, Timing};

/// Bytes per pixel on the wire
pub const BYTES_PER_PIXEL: usize = 3;

/// Configuration of the transmit side of a strip
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Number of pixels, fixed for the strip's lifetime
    pub length: usize,
    /// Channel acquisition parameters
    pub channel: ChannelConfig,
    /// Pulse timing of the LED family
    pub timing: Timing,
    /// Upper bound for a blocking refresh, `None` waits forever
    pub timeout: Option<Duration>,
    /// Reject buffer writes while a transmission is in flight
    pub busy_guard: bool,
}

impl DriverConfig {
    pub const fn new(length: usize, pin: u8) -> Self {
        Self {
            length,
            channel: ChannelConfig::new(pin),
            timing: Timing::WS2812,
            timeout: None,
            busy_guard: true,
        }
    }
}

/// Lifecycle state of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    /// Idle, buffer may be written
    Ready,
    /// A submitted frame has not signaled completion yet
    Transmitting,
    /// Channel and buffer are released
    Freed,
}

/// Owner of the pixel buffer and the transmit channel
pub struct StripDriver<P: ChannelProvider, const MAX_LEDS: usize> {
    provider: P,
    channel: Option<P::Channel>,
    encoder: Encoder,
    buffer: Vec<[u8; BYTES_PER_PIXEL], MAX_LEDS>,
    length: usize,
    timing: Timing,
    timeout: Option<Duration>,
    busy_guard: bool,
    state: TxState,
}

impl<P: ChannelProvider, const MAX_LEDS: usize> StripDriver<P, MAX_LEDS> {
    /// Allocate the buffer, acquire and enable a channel
    ///
    /// Anything acquired before a failing step is released before returning.
    /// The provider is consumed either way; pass `&mut provider` to keep a
    /// peripheral that must be retried after an error.
    pub fn init(mut provider: P, config: &DriverConfig) -> Result<Self, Error> {
        if config.length == 0 {
            return Err(ArgumentError::ZeroLength.into());
        }

        let mut buffer = Vec::new();
        if buffer.resize(config.length, [0; BYTES_PER_PIXEL]).is_err() {
            #[cfg(feature = "esp32-log")]
            println!(
                "[StripDriver.init] {} pixels exceed capacity of {}",
                config.length, MAX_LEDS
            );
            return Err(Error::ResourceExhausted);
        }

        let mut channel = provider.configure(&config.channel).map_err(|_error| {
            #[cfg(feature = "esp32-log")]
            println!("[StripDriver.init] channel acquisition failed: {:?}", _error);
            Error::ResourceExhausted
        })?;

        if let Err(_error) = provider.enable(&mut channel) {
            #[cfg(feature = "esp32-log")]
            println!("[StripDriver.init] channel enable failed: {:?}", _error);
            provider.release(channel);
            return Err(Error::ResourceExhausted);
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[StripDriver.init] {} pixels on gpio {}",
            config.length, config.channel.pin
        );

        Ok(Self {
            provider,
            channel: Some(channel),
            encoder: Encoder::new(&config.timing, config.channel.resolution_hz),
            buffer,
            length: config.length,
            timing: config.timing,
            timeout: config.timeout,
            busy_guard: config.busy_guard,
            state: TxState::Ready,
        })
    }

    /// Disable and release the channel, drop the buffer contents
    ///
    /// The driver reports zero pixels afterwards. Calling this again is a
    /// no-op.
    pub fn free(&mut self) -> Result<(), Error> {
        let Some(mut channel) = self.channel.take() else {
            return Ok(());
        };

        // Teardown continues even if the channel refuses to stop.
        let _ = self.provider.disable(&mut channel);
        self.provider.release(channel);
        self.buffer.clear();
        self.length = 0;
        self.state = TxState::Freed;

        #[cfg(feature = "esp32-log")]
        println!("[StripDriver.free] released");

        Ok(())
    }

    /// Send the buffer and block until it is on the wire and latched
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.submit()?;

        let timeout = self.timeout;
        self.wait(timeout)?;
        block_for(self.timing.reset_duration());
        Ok(())
    }

    /// Queue the buffer for transmission and return immediately
    ///
    /// Overlapping submissions are passed to the channel as-is; whether they
    /// queue or get rejected depends on its queue depth. Poll
    /// [`StripDriver::is_busy`] first to avoid both.
    pub fn refresh_async(&mut self) -> Result<(), Error> {
        self.submit()
    }

    /// Whether the last submitted frame is still being sent
    pub fn is_busy(&mut self) -> bool {
        if self.state != TxState::Transmitting {
            return false;
        }
        let Some(channel) = self.channel.as_mut() else {
            return false;
        };
        match self
            .provider
            .wait_all_done(channel, Some(Duration::from_ticks(0)))
        {
            Ok(()) => {
                self.state = TxState::Ready;
                false
            }
            Err(_) => true,
        }
    }

    /// Wait for in-flight frames without submitting a new one
    pub fn wait(&mut self, timeout: Option<Duration>) -> Result<(), Error> {
        let channel = self.channel.as_mut().ok_or(Error::freed())?;
        if self.state != TxState::Transmitting {
            return Ok(());
        }
        match self.provider.wait_all_done(channel, timeout) {
            Ok(()) => {
                self.state = TxState::Ready;
                Ok(())
            }
            Err(ChannelError::Timeout) => {
                #[cfg(feature = "esp32-log")]
                println!("[StripDriver.wait] timed out after {:?}", timeout);
                Err(Error::Timeout)
            }
            Err(error) => Err(Error::from_transmit(error)),
        }
    }

    /// Write one pixel's wire bytes
    pub fn write_pixel(&mut self, index: usize, bytes: [u8; BYTES_PER_PIXEL]) -> Result<(), Error> {
        self.ensure_writable()?;
        let length = self.length;
        let slot = self
            .buffer
            .get_mut(index)
            .ok_or(Error::index_out_of_range(index, length))?;
        *slot = bytes;
        Ok(())
    }

    /// Write the same wire bytes to `len` pixels starting at `start`
    pub fn write_range(
        &mut self,
        start: usize,
        len: usize,
        bytes: [u8; BYTES_PER_PIXEL],
    ) -> Result<(), Error> {
        self.ensure_writable()?;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.length)
            .ok_or(ArgumentError::RangeOutOfBounds {
                start,
                len,
                length: self.length,
            })?;
        self.buffer[start..end].fill(bytes);
        Ok(())
    }

    /// Write the same wire bytes to every pixel
    pub fn fill(&mut self, bytes: [u8; BYTES_PER_PIXEL]) -> Result<(), Error> {
        self.ensure_writable()?;
        self.buffer.fill(bytes);
        Ok(())
    }

    /// Stored wire bytes of one pixel
    pub fn pixel(&self, index: usize) -> Result<[u8; BYTES_PER_PIXEL], Error> {
        if self.state == TxState::Freed {
            return Err(Error::freed());
        }
        self.buffer
            .get(index)
            .copied()
            .ok_or(Error::index_out_of_range(index, self.length))
    }

    /// Whole buffer, `len() * 3` bytes in wire order
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_flattened()
    }

    /// Number of pixels, zero once freed
    pub const fn len(&self) -> usize {
        self.length
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub const fn state(&self) -> TxState {
        self.state
    }

    pub const fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Channel provider, for inspection
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Channel provider, for simulated peripherals that need to be driven
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Encode the buffer and hand it to the channel
    fn submit(&mut self) -> Result<(), Error> {
        let channel = self.channel.as_mut().ok_or(Error::freed())?;
        let symbols = self.encoder.encode(self.buffer.as_flattened());
        if let Err(error) = self.provider.transmit(channel, symbols, 0) {
            #[cfg(feature = "esp32-log")]
            println!("[StripDriver.submit] transmit failed: {:?}", error);
            return Err(Error::from_transmit(error));
        }
        self.state = TxState::Transmitting;
        Ok(())
    }

    /// Refuse writes to a freed strip, and to a busy one when guarded
    fn ensure_writable(&mut self) -> Result<(), Error> {
        let state = self.state;
        match state {
            TxState::Freed => Err(Error::freed()),
            TxState::Transmitting if self.busy_guard && self.is_busy() => Err(Error::Busy),
            _ => Ok(()),
        }
    }
}
