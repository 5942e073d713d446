//! Per-tag payload shapes.
//!
//! Every field defaults to its zero value when absent so that a missing field
//! and an explicit `0` / `""` are reported the same way: as a missing required
//! field, not as a parse failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::error::{Error, Result};
use crate::tag::Tag;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupData {
    pub name: String,
    pub bank_id: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigninData {
    pub user_id: i64,
}

/// Shared by `sell.order` and `buy.order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderData {
    pub user_id: i64,
    pub order_id: i64,
    pub amount: i64,
    pub price: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyErrorData {
    pub user_id: i64,
    pub amount: i64,
    pub price: i64,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeData {
    pub trade_id: i64,
    pub amount: i64,
    pub price: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellCloseData {
    pub trade_id: i64,
    pub user_id: i64,
    pub sell_id: i64,
    pub amount: i64,
    pub price: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyCloseData {
    pub trade_id: i64,
    pub user_id: i64,
    pub buy_id: i64,
    pub amount: i64,
    pub price: i64,
}

/// Decoded payload, one variant per tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogData {
    Signup(SignupData),
    Signin(SigninData),
    SellOrder(OrderData),
    BuyOrder(OrderData),
    BuyError(BuyErrorData),
    Trade(TradeData),
    SellClose(SellCloseData),
    BuyClose(BuyCloseData),
}

impl LogData {
    /// Decodes `raw` into the shape required by `tag`.
    pub fn parse(tag: Tag, raw: &str) -> Result<Self> {
        let data = match tag {
            Tag::Signup => Self::Signup(decode(tag, raw)?),
            Tag::Signin => Self::Signin(decode(tag, raw)?),
            Tag::SellOrder => Self::SellOrder(decode(tag, raw)?),
            Tag::BuyOrder => Self::BuyOrder(decode(tag, raw)?),
            Tag::BuyError => Self::BuyError(decode(tag, raw)?),
            Tag::Trade => Self::Trade(decode(tag, raw)?),
            Tag::SellClose => Self::SellClose(decode(tag, raw)?),
            Tag::BuyClose => Self::BuyClose(decode(tag, raw)?),
        };
        Ok(data)
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::Signup(_) => Tag::Signup,
            Self::Signin(_) => Tag::Signin,
            Self::SellOrder(_) => Tag::SellOrder,
            Self::BuyOrder(_) => Tag::BuyOrder,
            Self::BuyError(_) => Tag::BuyError,
            Self::Trade(_) => Tag::Trade,
            Self::SellClose(_) => Tag::SellClose,
            Self::BuyClose(_) => Tag::BuyClose,
        }
    }

    /// Checks required fields in a fixed order; the first missing one is reported.
    pub fn check_required(&self) -> Result<()> {
        let req = Required(self.tag());
        match self {
            Self::Signup(d) => {
                req.text("name", &d.name)?;
                req.text("bank_id", &d.bank_id)?;
                req.id("user_id", d.user_id)
            }
            Self::Signin(d) => req.id("user_id", d.user_id),
            Self::SellOrder(d) | Self::BuyOrder(d) => {
                req.id("user_id", d.user_id)?;
                req.id("order_id", d.order_id)?;
                req.id("amount", d.amount)?;
                req.id("price", d.price)
            }
            Self::BuyError(d) => {
                req.id("user_id", d.user_id)?;
                req.text("error", &d.error)?;
                req.id("amount", d.amount)?;
                req.id("price", d.price)
            }
            Self::Trade(d) => {
                req.id("trade_id", d.trade_id)?;
                req.id("amount", d.amount)?;
                req.id("price", d.price)
            }
            Self::SellClose(d) => {
                req.id("trade_id", d.trade_id)?;
                req.id("user_id", d.user_id)?;
                req.id("sell_id", d.sell_id)?;
                req.id("amount", d.amount)?;
                req.id("price", d.price)
            }
            Self::BuyClose(d) => {
                req.id("trade_id", d.trade_id)?;
                req.id("user_id", d.user_id)?;
                req.id("buy_id", d.buy_id)?;
                req.id("amount", d.amount)?;
                req.id("price", d.price)
            }
        }
    }

    /// User the record is indexed under, 0 for `trade`.
    pub fn user_id(&self) -> i64 {
        match self {
            Self::Signup(d) => d.user_id,
            Self::Signin(d) => d.user_id,
            Self::SellOrder(d) | Self::BuyOrder(d) => d.user_id,
            Self::BuyError(d) => d.user_id,
            Self::Trade(_) => 0,
            Self::SellClose(d) => d.user_id,
            Self::BuyClose(d) => d.user_id,
        }
    }

    /// Trade the record is indexed under, 0 unless the tag is a trade or close.
    pub fn trade_id(&self) -> i64 {
        match self {
            Self::Trade(d) => d.trade_id,
            Self::SellClose(d) => d.trade_id,
            Self::BuyClose(d) => d.trade_id,
            _ => 0,
        }
    }
}

fn decode<T: DeserializeOwned>(tag: Tag, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| match e.classify() {
        Category::Io => Error::internal(format!("{} parse data failed: {}", tag, e)),
        Category::Syntax | Category::Data | Category::Eof => {
            Error::invalid_format(format!("{} parse data failed: {}", tag, e))
        }
    })
}

struct Required(Tag);

impl Required {
    fn id(&self, field: &str, value: i64) -> Result<()> {
        if value == 0 {
            return Err(self.missing(field));
        }
        Ok(())
    }

    fn text(&self, field: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(self.missing(field));
        }
        Ok(())
    }

    fn missing(&self, field: &str) -> Error {
        Error::missing_field(format!("{} data.{} is required", self.0, field))
    }
}
