//! ClickHouse table schema.

/// Table receiving one row per accepted log.
pub const LOG_TABLE: &str = "log";

/// SQL for creating the log table.
///
/// `tag` holds the numeric tag code. `user_id` and `trade_id` are 0 when the
/// tag does not carry them. `data` is the payload exactly as received.
pub const CREATE_LOG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS log (
    app_id String,
    tag UInt8,
    time DateTime64(0, 'Asia/Tokyo'),
    user_id Int64,
    trade_id Int64,
    data String,
    created_at DateTime DEFAULT now()
)
ENGINE = MergeTree()
ORDER BY (app_id, time)
"#;

/// All DDL statements, in execution order.
pub fn all_tables() -> Vec<&'static str> {
    vec![CREATE_LOG_TABLE]
}
