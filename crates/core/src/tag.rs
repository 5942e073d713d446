//! Log tags and their storage codes.

use std::fmt;

/// All tags the benchmark harness sends.
///
/// The discriminants are the codes persisted in the `tag` column and must not
/// be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Signup = 1,
    Signin = 2,
    SellOrder = 3,
    BuyOrder = 4,
    BuyError = 5,
    Trade = 6,
    SellClose = 7,
    BuyClose = 8,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Self::Signup,
        Self::Signin,
        Self::SellOrder,
        Self::BuyOrder,
        Self::BuyError,
        Self::Trade,
        Self::SellClose,
        Self::BuyClose,
    ];

    /// Parses a wire tag. Unknown tags yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "signup" => Some(Self::Signup),
            "signin" => Some(Self::Signin),
            "sell.order" => Some(Self::SellOrder),
            "buy.order" => Some(Self::BuyOrder),
            "buy.error" => Some(Self::BuyError),
            "trade" => Some(Self::Trade),
            "sell.close" => Some(Self::SellClose),
            "buy.close" => Some(Self::BuyClose),
            _ => None,
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Signin => "signin",
            Self::SellOrder => "sell.order",
            Self::BuyOrder => "buy.order",
            Self::BuyError => "buy.error",
            Self::Trade => "trade",
            Self::SellClose => "sell.close",
            Self::BuyClose => "buy.close",
        }
    }

    /// Returns the numeric code stored with each record.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
