//! Test fixtures and request body builders.

use chrono::Utc;
use serde_json::{json, Value};

/// Application key used by most tests.
pub const APP_ID: &str = "app1";

/// Current server time in unix seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// A log envelope stamped with the current time.
pub fn log(tag: &str, data: Value) -> Value {
    json!({ "tag": tag, "time": now(), "data": data })
}

/// A valid signup log.
pub fn signup(user_id: i64) -> Value {
    log(
        "signup",
        json!({ "name": "a", "bank_id": "b", "user_id": user_id }),
    )
}

/// A valid trade log.
pub fn trade(trade_id: i64) -> Value {
    log(
        "trade",
        json!({ "trade_id": trade_id, "amount": 1, "price": 100 }),
    )
}

/// A valid buy.close log.
pub fn buy_close(trade_id: i64, user_id: i64) -> Value {
    log(
        "buy.close",
        json!({ "trade_id": trade_id, "user_id": user_id, "buy_id": 3, "amount": 1, "price": 100 }),
    )
}

/// Body for `POST /send`: the envelope fields plus `app_id`.
pub fn send_body(app_id: &str, log: Value) -> Value {
    let mut body = log;
    body["app_id"] = Value::String(app_id.to_string());
    body
}

/// Body for `POST /send_bulk`.
pub fn bulk_body(app_id: &str, logs: Vec<Value>) -> Value {
    json!({ "app_id": app_id, "logs": logs })
}

/// A bulk body whose serialized size exceeds the 1MB cap.
pub fn oversized_bulk_body(app_id: &str) -> String {
    let filler = "x".repeat(1024);
    let logs: Vec<Value> = (0..1100)
        .map(|i| {
            log(
                "signup",
                json!({ "name": filler, "bank_id": "b", "user_id": i + 1 }),
            )
        })
        .collect();
    bulk_body(app_id, logs).to_string()
}
