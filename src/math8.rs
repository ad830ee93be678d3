/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Computes `floor(value * scale / 255)`, so `scale == 255` returns the input
/// unchanged and `scale == 0` always yields 0.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    if scale == 255 {
        return value;
    }
    ((value as u16 * scale as u16) / 255) as u8
}

/// Convert a nanosecond duration into ticks of a clock running at `resolution_hz`
///
/// Truncates toward zero.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn ns_to_ticks(ns: u32, resolution_hz: u32) -> u64 {
    (ns as u64 * resolution_hz as u64) / 1_000_000_000
}
