//! Gamma correction lookup table
//!
//! The table is built on first use and shared by every strip. It never
//! changes after that. The critical section only guards copying it in and
//! out, lookups run outside of it.

use core::cell::Cell;

use critical_section::Mutex;

use super::Rgb;

/// Exponent of the correction curve
pub const GAMMA: f64 = 2.2;

static TABLE: Mutex<Cell<Option<[u8; 256]>>> = Mutex::new(Cell::new(None));

/// Compute `round(255 * (c / 255) ^ 2.2)` for every 8-bit input
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
pub fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (value, slot) in table.iter_mut().enumerate() {
        let normalized = value as f64 / 255.0;
        *slot = libm::round(255.0 * libm::pow(normalized, GAMMA)) as u8;
    }
    table
}

/// Copy of the shared table, building it if needed
///
/// Racing first callers may each build it; the results are identical.
pub fn table() -> [u8; 256] {
    if let Some(table) = critical_section::with(|cs| TABLE.borrow(cs).get()) {
        return table;
    }
    let table = build_table();
    critical_section::with(|cs| TABLE.borrow(cs).set(Some(table)));
    table
}

/// Run `f` against the shared table, building it if needed
///
/// `f` runs outside the critical section and may use the table again.
pub fn with_table<R>(f: impl FnOnce(&[u8; 256]) -> R) -> R {
    let table = table();
    f(&table)
}

/// Gamma-correct a single channel value
pub fn correct(value: u8) -> u8 {
    with_table(|table| table[value as usize])
}

/// Gamma-correct all three channels
pub fn correct_rgb(color: Rgb) -> Rgb {
    with_table(|table| Rgb {
        r: table[color.r as usize],
        g: table[color.g as usize],
        b: table[color.b as usize],
    })
}
