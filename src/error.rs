use core::fmt;

use crate::channel::ChannelError;

/// Reason an argument was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    /// Strip length must be greater than zero
    ZeroLength,
    /// Pixel index is outside of the strip
    IndexOutOfRange { index: usize, length: usize },
    /// Pixel span runs past the end of the strip
    RangeOutOfBounds {
        start: usize,
        len: usize,
        length: usize,
    },
    /// The strip has already been freed
    Freed,
}

/// Errors returned by strip operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Caller passed something the strip cannot act on
    InvalidArgument(ArgumentError),
    /// Pixel buffer or peripheral resources are not available
    ResourceExhausted,
    /// The channel refused the transmission
    TransmitRejected,
    /// Waiting for the channel exceeded the timeout
    Timeout,
    /// Buffer mutation was refused because a transmission is in flight
    Busy,
}

impl Error {
    pub(crate) const fn index_out_of_range(index: usize, length: usize) -> Self {
        Self::InvalidArgument(ArgumentError::IndexOutOfRange { index, length })
    }

    pub(crate) const fn freed() -> Self {
        Self::InvalidArgument(ArgumentError::Freed)
    }

    /// Map a failed submit to the strip error taxonomy
    pub(crate) const fn from_transmit(error: ChannelError) -> Self {
        match error {
            ChannelError::NoResources => Self::ResourceExhausted,
            ChannelError::Timeout => Self::Timeout,
            ChannelError::QueueFull | ChannelError::InvalidState => Self::TransmitRejected,
        }
    }
}

impl From<ArgumentError> for Error {
    fn from(value: ArgumentError) -> Self {
        Self::InvalidArgument(value)
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLength => f.write_str("strip length is zero"),
            Self::IndexOutOfRange { index, length } => {
                write!(f, "pixel {index} is out of range for a strip of {length}")
            }
            Self::RangeOutOfBounds { start, len, length } => write!(
                f,
                "pixels {start}..{} exceed a strip of {length}",
                start.saturating_add(*len)
            ),
            Self::Freed => f.write_str("strip is freed"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            Self::ResourceExhausted => f.write_str("resources exhausted"),
            Self::TransmitRejected => f.write_str("transmission rejected by channel"),
            Self::Timeout => f.write_str("timed out waiting for channel"),
            Self::Busy => f.write_str("transmission in flight"),
        }
    }
}

impl core::error::Error for Error {}
