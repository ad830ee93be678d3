//! In-memory pulse generator
//!
//! [`SimPeripheral`] implements [`ChannelProvider`] without hardware so strips
//! can run on a host. It counts every lifecycle call, keeps the symbols of the
//! last frame, emulates the transmit queue depth and can be told to fail
//! acquisition steps.

use embassy_time::Duration;
use heapless::{Deque, Vec};

use crate::channel::{ChannelConfig, ChannelError, ChannelProvider};
use crate::protocol::{Symbol, Symbols};

/// Handle of a simulated channel
#[derive(Debug)]
pub struct SimChannel {
    id: u8,
    config: ChannelConfig,
    enabled: bool,
}

impl SimChannel {
    pub const fn id(&self) -> u8 {
        self.id
    }

    pub const fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Lifecycle call counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub configured: usize,
    pub enabled: usize,
    pub disabled: usize,
    pub released: usize,
    pub transmitted: usize,
    pub rejected: usize,
}

impl SimStats {
    /// Channels acquired and not yet released
    pub const fn live_channels(&self) -> usize {
        self.configured - self.released
    }
}

/// Steps that should fail on the next attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimFaults {
    pub configure: bool,
    pub enable: bool,
}

/// Simulated peripheral with `QUEUE` transmit slots and room for `SYMBOLS`
/// symbols per frame
#[derive(Debug)]
pub struct SimPeripheral<const QUEUE: usize, const SYMBOLS: usize> {
    next_id: u8,
    stats: SimStats,
    faults: SimFaults,
    auto_complete: bool,
    /// Symbol counts of frames still on the wire
    pending: Deque<usize, QUEUE>,
    last_frame: Vec<Symbol, SYMBOLS>,
    last_loop_count: u32,
}

impl<const QUEUE: usize, const SYMBOLS: usize> SimPeripheral<QUEUE, SYMBOLS> {
    /// Peripheral whose transmissions finish as soon as anyone waits on them
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            stats: SimStats {
                configured: 0,
                enabled: 0,
                disabled: 0,
                released: 0,
                transmitted: 0,
                rejected: 0,
            },
            faults: SimFaults {
                configure: false,
                enable: false,
            },
            auto_complete: true,
            pending: Deque::new(),
            last_frame: Vec::new(),
            last_loop_count: 0,
        }
    }

    /// Keep transmissions pending until completed explicitly
    ///
    /// Only an unbounded wait still drains them.
    #[must_use]
    pub fn with_manual_completion(mut self) -> Self {
        self.auto_complete = false;
        self
    }

    #[must_use]
    pub fn with_faults(mut self, faults: SimFaults) -> Self {
        self.faults = faults;
        self
    }

    /// Change which steps fail from now on
    pub fn set_faults(&mut self, faults: SimFaults) {
        self.faults = faults;
    }

    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Symbols of the most recent accepted frame
    pub fn last_frame(&self) -> &[Symbol] {
        &self.last_frame
    }

    pub const fn last_loop_count(&self) -> u32 {
        self.last_loop_count
    }

    /// Frames submitted but not finished
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Finish the oldest in-flight frame
    pub fn complete_one(&mut self) -> bool {
        self.pending.pop_front().is_some()
    }

    /// Finish every in-flight frame
    pub fn complete_all(&mut self) {
        self.pending.clear();
    }
}

impl<const QUEUE: usize, const SYMBOLS: usize> Default for SimPeripheral<QUEUE, SYMBOLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const QUEUE: usize, const SYMBOLS: usize> ChannelProvider for SimPeripheral<QUEUE, SYMBOLS> {
    type Channel = SimChannel;

    fn configure(&mut self, config: &ChannelConfig) -> Result<SimChannel, ChannelError> {
        if self.faults.configure {
            return Err(ChannelError::NoResources);
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.stats.configured += 1;
        Ok(SimChannel {
            id,
            config: *config,
            enabled: false,
        })
    }

    fn enable(&mut self, channel: &mut SimChannel) -> Result<(), ChannelError> {
        if self.faults.enable {
            return Err(ChannelError::InvalidState);
        }
        channel.enabled = true;
        self.stats.enabled += 1;
        Ok(())
    }

    fn disable(&mut self, channel: &mut SimChannel) -> Result<(), ChannelError> {
        if !channel.enabled {
            return Err(ChannelError::InvalidState);
        }
        channel.enabled = false;
        self.stats.disabled += 1;
        Ok(())
    }

    fn release(&mut self, _channel: SimChannel) {
        self.pending.clear();
        self.stats.released += 1;
    }

    fn transmit(
        &mut self,
        channel: &mut SimChannel,
        symbols: Symbols<'_>,
        loop_count: u32,
    ) -> Result<(), ChannelError> {
        if !channel.enabled {
            self.stats.rejected += 1;
            return Err(ChannelError::InvalidState);
        }
        let depth = channel.config.queue_depth.min(QUEUE);
        if self.pending.len() >= depth {
            self.stats.rejected += 1;
            return Err(ChannelError::QueueFull);
        }

        let count = symbols.len();
        if count > SYMBOLS {
            self.stats.rejected += 1;
            return Err(ChannelError::NoResources);
        }
        self.last_frame.clear();
        self.last_frame.extend(symbols);
        self.last_loop_count = loop_count;

        self.pending
            .push_back(count)
            .map_err(|_| ChannelError::QueueFull)?;
        self.stats.transmitted += 1;
        Ok(())
    }

    fn wait_all_done(
        &mut self,
        _channel: &mut SimChannel,
        timeout: Option<Duration>,
    ) -> Result<(), ChannelError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        if self.auto_complete || timeout.is_none() {
            self.pending.clear();
            return Ok(());
        }
        Err(ChannelError::Timeout)
    }
}
