//! ClickHouse storage for the log server.

pub mod client;
pub mod config;
pub mod health;
pub mod query;
pub mod schema;
pub mod sink;

pub use client::*;
pub use config::*;
pub use query::*;
pub use sink::{ClickHouseSink, LogRow, LogSink};
