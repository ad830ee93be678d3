//! Single-wire LED protocol encoder
//!
//! Every data bit becomes one [`Symbol`]: a high pulse followed by a low
//! pulse whose durations tell a logical 0 from a logical 1. Bytes are sent
//! most significant bit first, in buffer order, and every frame ends with a
//! single idle-low reset symbol that latches the data into the LEDs.

use core::iter::FusedIterator;

use embassy_time::Duration;

use crate::error::Error;
use crate::math8::ns_to_ticks;

/// Symbol clock the timing table is specified against (100 ns per tick)
pub const DEFAULT_RESOLUTION_HZ: u32 = 10_000_000;

/// Largest duration a single symbol half can hold (15 bits)
pub const MAX_SYMBOL_DURATION: u16 = 0x7FFF;

/// Number of symbols needed to send `byte_len` bytes plus the reset symbol
pub const fn symbol_count(byte_len: usize) -> usize {
    byte_len * 8 + 1
}

/// Pulse timing of one LED family, in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// High time of a logical 0
    pub t0h_ns: u32,
    /// Low time of a logical 0
    pub t0l_ns: u32,
    /// High time of a logical 1
    pub t1h_ns: u32,
    /// Low time of a logical 1
    pub t1l_ns: u32,
    /// Minimum idle-low time that latches a frame
    pub reset_us: u32,
}

impl Timing {
    /// WS2812 timing
    pub const WS2812: Self = Self {
        t0h_ns: 400,
        t0l_ns: 850,
        t1h_ns: 800,
        t1l_ns: 450,
        reset_us: 60,
    };

    /// Latch time as a duration
    #[allow(clippy::cast_lossless)]
    pub const fn reset_duration(&self) -> Duration {
        Duration::from_micros(self.reset_us as u64)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::WS2812
    }
}

/// One high/low pulse pair in peripheral ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Symbol {
    pub level0: bool,
    pub duration0: u16,
    pub level1: bool,
    pub duration1: u16,
}

impl Symbol {
    /// Pulse that starts high and ends low
    pub const fn high_low(high: u16, low: u16) -> Self {
        Self {
            level0: true,
            duration0: high,
            level1: false,
            duration1: low,
        }
    }

    /// Idle-low symbol lasting `duration` ticks
    pub const fn idle(duration: u16) -> Self {
        Self {
            level0: false,
            duration0: duration,
            level1: false,
            duration1: 0,
        }
    }

    /// Pack into a 32-bit word
    ///
    /// Layout: `duration0` in bits 0..15, `level0` in bit 15, `duration1` in
    /// bits 16..31, `level1` in bit 31.
    #[allow(clippy::cast_lossless)]
    pub const fn pack(self) -> u32 {
        (self.duration0 & MAX_SYMBOL_DURATION) as u32
            | (self.level0 as u32) << 15
            | ((self.duration1 & MAX_SYMBOL_DURATION) as u32) << 16
            | (self.level1 as u32) << 31
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn ticks(ns: u32, resolution_hz: u32) -> u16 {
    let ticks = ns_to_ticks(ns, resolution_hz);
    if ticks > MAX_SYMBOL_DURATION as u64 {
        MAX_SYMBOL_DURATION
    } else {
        ticks as u16
    }
}

/// Timing table resolved against a symbol clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    bit0: Symbol,
    bit1: Symbol,
    reset: Symbol,
}

/// WS2812 encoder at the default 10 MHz resolution
pub const WS2812: Encoder = Encoder::new(&Timing::WS2812, DEFAULT_RESOLUTION_HZ);

/// Latch symbol that ends every WS2812 frame (600 ticks low)
pub const RESET_SYMBOL: Symbol = WS2812.reset;

impl Encoder {
    /// Resolve `timing` for a channel ticking at `resolution_hz`
    ///
    /// Durations are truncated to whole ticks and saturate at
    /// [`MAX_SYMBOL_DURATION`].
    pub const fn new(timing: &Timing, resolution_hz: u32) -> Self {
        Self {
            bit0: Symbol::high_low(
                ticks(timing.t0h_ns, resolution_hz),
                ticks(timing.t0l_ns, resolution_hz),
            ),
            bit1: Symbol::high_low(
                ticks(timing.t1h_ns, resolution_hz),
                ticks(timing.t1l_ns, resolution_hz),
            ),
            reset: Symbol::idle(ticks(timing.reset_us.saturating_mul(1000), resolution_hz)),
        }
    }

    /// Symbol for a single data bit
    pub const fn bit(&self, set: bool) -> Symbol {
        if set { self.bit1 } else { self.bit0 }
    }

    /// Frame terminating latch symbol
    pub const fn reset(&self) -> Symbol {
        self.reset
    }

    /// Lazily encode `bytes`, followed by the reset symbol
    pub const fn encode<'a>(&self, bytes: &'a [u8]) -> Symbols<'a> {
        Symbols {
            encoder: *self,
            bytes,
            bit: 0,
            reset_pending: true,
        }
    }

    /// Encode `bytes` into `out`, returning the number of symbols written
    pub fn encode_into(&self, bytes: &[u8], out: &mut [Symbol]) -> Result<usize, Error> {
        let count = symbol_count(bytes.len());
        if out.len() < count {
            return Err(Error::ResourceExhausted);
        }
        for (slot, symbol) in out.iter_mut().zip(self.encode(bytes)) {
            *slot = symbol;
        }
        Ok(count)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        WS2812
    }
}

/// Encode `bytes` with the default WS2812 encoder
pub const fn encode(bytes: &[u8]) -> Symbols<'_> {
    WS2812.encode(bytes)
}

/// Symbol stream of one frame: data bits, then exactly one reset symbol
#[derive(Debug, Clone)]
pub struct Symbols<'a> {
    encoder: Encoder,
    bytes: &'a [u8],
    /// Next bit of `bytes[0]`, counted from the MSB
    bit: u8,
    reset_pending: bool,
}

impl Iterator for Symbols<'_> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        if let Some((&byte, rest)) = self.bytes.split_first() {
            let set = byte & (0x80 >> self.bit) != 0;
            self.bit += 1;
            if self.bit == 8 {
                self.bit = 0;
                self.bytes = rest;
            }
            return Some(self.encoder.bit(set));
        }
        if self.reset_pending {
            self.reset_pending = false;
            return Some(self.encoder.reset);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() * 8 - self.bit as usize + usize::from(self.reset_pending);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Symbols<'_> {}

impl FusedIterator for Symbols<'_> {}
