//! Wire envelopes and the validated record handed to storage.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{Error, Result};
use crate::tag::Tag;

/// One tagged log as sent by the harness.
///
/// `data` is kept as raw JSON; its shape depends on `tag` and is only decoded
/// during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    #[serde(default)]
    pub tag: String,
    /// Unix seconds
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl Log {
    /// Builds a log from an already parsed JSON payload.
    pub fn from_json(tag: impl Into<String>, time: i64, data: &serde_json::Value) -> Result<Self> {
        let data = serde_json::value::to_raw_value(data)
            .map_err(|e| Error::invalid_format(format!("encode data failed: {}", e)))?;
        Ok(Self {
            tag: tag.into(),
            time,
            data: Some(data),
        })
    }

    /// Raw payload text, empty when absent or `null`.
    pub fn raw_data(&self) -> &str {
        self.data.as_deref().map(RawValue::get).unwrap_or("")
    }
}

/// Body of `POST /send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoloLog {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl SoloLog {
    /// Splits the request into its application key and log.
    pub fn into_parts(self) -> (String, Log) {
        (
            self.app_id,
            Log {
                tag: self.tag,
                time: self.time,
                data: self.data,
            },
        )
    }
}

/// Body of `POST /send_bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkLog {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub logs: Vec<Log>,
}

/// A log that passed validation, ready for a single storage insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub app_id: String,
    pub tag: Tag,
    /// Unix seconds
    pub time: i64,
    /// 0 when the tag carries no user
    pub user_id: i64,
    /// 0 when the tag carries no trade
    pub trade_id: i64,
    /// Payload exactly as received
    pub data: String,
}
