//! Physical channel order
//!
//! Different LED chains expect the three color bytes in different orders.

use crate::color::Rgb;

const ORDER_NAME_GRB: &str = "grb";
const ORDER_NAME_RGB: &str = "rgb";
const ORDER_NAME_BRG: &str = "brg";

const ORDER_ID_GRB: u8 = 0;
const ORDER_ID_RGB: u8 = 1;
const ORDER_ID_BRG: u8 = 2;

/// Byte order a strip expects on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ChannelOrder {
    /// WS2812 and most clones
    #[default]
    Grb = ORDER_ID_GRB,
    Rgb = ORDER_ID_RGB,
    Brg = ORDER_ID_BRG,
}

impl ChannelOrder {
    /// Decode a raw order id, falling back to GRB for unknown values
    pub const fn from_raw(value: u8) -> Self {
        match value {
            ORDER_ID_RGB => Self::Rgb,
            ORDER_ID_BRG => Self::Brg,
            _ => Self::Grb,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grb => ORDER_NAME_GRB,
            Self::Rgb => ORDER_NAME_RGB,
            Self::Brg => ORDER_NAME_BRG,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ORDER_NAME_GRB => Some(Self::Grb),
            ORDER_NAME_RGB => Some(Self::Rgb),
            ORDER_NAME_BRG => Some(Self::Brg),
            _ => None,
        }
    }

    /// Permute a logical color into wire order
    pub const fn arrange(self, color: Rgb) -> [u8; 3] {
        match self {
            Self::Grb => [color.g, color.r, color.b],
            Self::Rgb => [color.r, color.g, color.b],
            Self::Brg => [color.b, color.r, color.g],
        }
    }
}
