#![no_std]

pub mod channel;
pub mod color;
pub mod driver;
pub mod error;
pub mod math8;
pub mod pipeline;
pub mod protocol;
pub mod sim;
pub mod strip;

pub use channel::{ChannelConfig, ChannelError, ChannelProvider};
pub use driver::{DriverConfig, StripDriver, TxState};
pub use error::{ArgumentError, Error};
pub use pipeline::{ChannelOrder, PipelineConfig, PipelineSettings};
pub use protocol::{Encoder, RESET_SYMBOL, Symbol, Symbols, Timing, encode};
pub use strip::{LedStrip, StripConfig};

pub use color::{Rgb, Rgbw};
pub use embassy_time::Duration;
pub use smart_leds::SmartLedsWrite;
