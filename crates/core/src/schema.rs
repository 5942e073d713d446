//! Log validation.

use crate::error::{Error, Result, ValidationErrorCode};
use crate::limits::MAX_LOG_AGE_SECS;
use crate::log::{Log, LogRecord};
use crate::payload::LogData;
use crate::tag::Tag;

/// Rejects requests without an application key.
pub fn require_app_id(app_id: &str) -> Result<()> {
    if app_id.is_empty() {
        return Err(Error::validation_code(
            ValidationErrorCode::MissingAppId,
            "app_id is required",
        ));
    }
    Ok(())
}

/// Validates a log against its tag schema and builds the record to store.
///
/// `now` is the server clock in unix seconds. Checks run in order and the
/// first failure is returned: payload present, not stale, known tag, payload
/// decodes, required fields present.
pub fn validate_log(app_id: &str, log: &Log, now: i64) -> Result<LogRecord> {
    let raw = log.raw_data();
    if raw.is_empty() {
        return Err(Error::validation_code(
            ValidationErrorCode::MissingData,
            format!("{} data is required", log.tag),
        ));
    }

    if log.time < now - MAX_LOG_AGE_SECS {
        return Err(Error::validation_code(
            ValidationErrorCode::StaleTimestamp,
            format!("{} time is too old", log.time),
        ));
    }

    let tag = Tag::parse(&log.tag).ok_or_else(|| {
        Error::validation_code(
            ValidationErrorCode::UnknownTag,
            format!("{} unknown tag", log.tag),
        )
    })?;

    let data = LogData::parse(tag, raw)?;
    data.check_required()?;

    Ok(LogRecord {
        app_id: app_id.to_string(),
        tag,
        time: log.time,
        user_id: data.user_id(),
        trade_id: data.trade_id(),
        data: raw.to_string(),
    })
}
