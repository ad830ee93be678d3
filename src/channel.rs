//! Pulse generator capability
//!
//! The strip does not talk to a concrete peripheral. It drives anything that
//! can hand out a transmit channel, accept a symbol stream on it and report
//! when the stream has left the wire.

use embassy_time::Duration;

use crate::protocol::{DEFAULT_RESOLUTION_HZ, Symbols};

/// Parameters used to acquire a transmit channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// GPIO number of the data line
    pub pin: u8,
    /// Symbol clock in Hz
    pub resolution_hz: u32,
    /// Symbols the channel keeps in its own memory block
    pub mem_block_symbols: usize,
    /// Transmissions the channel can queue before rejecting new ones
    pub queue_depth: usize,
}

impl ChannelConfig {
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            resolution_hz: DEFAULT_RESOLUTION_HZ,
            mem_block_symbols: 64,
            queue_depth: 4,
        }
    }
}

/// Errors reported by a channel provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// No channel, memory or encoder left to hand out
    NoResources,
    /// Transmit queue is at capacity
    QueueFull,
    /// Channel is not enabled or was already released
    InvalidState,
    /// Transmissions did not finish within the timeout
    Timeout,
}

/// Peripheral that hands out transmit channels
///
/// `transmit` must not block: the provider copies or streams the symbols into
/// its own memory before returning, and completion is observed through
/// [`ChannelProvider::wait_all_done`].
pub trait ChannelProvider {
    /// Handle of an acquired channel
    type Channel;

    /// Acquire and configure a channel
    fn configure(&mut self, config: &ChannelConfig) -> Result<Self::Channel, ChannelError>;

    /// Start the channel so it accepts transmissions
    fn enable(&mut self, channel: &mut Self::Channel) -> Result<(), ChannelError>;

    /// Stop the channel
    fn disable(&mut self, channel: &mut Self::Channel) -> Result<(), ChannelError>;

    /// Give the channel back to the peripheral
    fn release(&mut self, channel: Self::Channel);

    /// Queue a symbol stream for transmission, sent `loop_count + 1` times
    fn transmit(
        &mut self,
        channel: &mut Self::Channel,
        symbols: Symbols<'_>,
        loop_count: u32,
    ) -> Result<(), ChannelError>;

    /// Wait until every queued transmission has finished
    ///
    /// `None` waits forever, a zero timeout only polls. Returns
    /// [`ChannelError::Timeout`] if transmissions are still pending.
    fn wait_all_done(
        &mut self,
        channel: &mut Self::Channel,
        timeout: Option<Duration>,
    ) -> Result<(), ChannelError>;
}

impl<T: ChannelProvider + ?Sized> ChannelProvider for &mut T {
    type Channel = T::Channel;

    fn configure(&mut self, config: &ChannelConfig) -> Result<Self::Channel, ChannelError> {
        T::configure(self, config)
    }

    fn enable(&mut self, channel: &mut Self::Channel) -> Result<(), ChannelError> {
        T::enable(self, channel)
    }

    fn disable(&mut self, channel: &mut Self::Channel) -> Result<(), ChannelError> {
        T::disable(self, channel)
    }

    fn release(&mut self, channel: Self::Channel) {
        T::release(self, channel);
    }

    fn transmit(
        &mut self,
        channel: &mut Self::Channel,
        symbols: Symbols<'_>,
        loop_count: u32,
    ) -> Result<(), ChannelError> {
        T::transmit(self, channel, symbols, loop_count)
    }

    fn wait_all_done(
        &mut self,
        channel: &mut Self::Channel,
        timeout: Option<Duration>,
    ) -> Result<(), ChannelError> {
        T::wait_all_done(self, channel, timeout)
    }
}
