//! Core types, tag schemas, and validation for the benchmark log server.

pub mod error;
pub mod limits;
pub mod log;
pub mod payload;
pub mod schema;
pub mod tag;

pub use error::{Error, Result};
pub use log::*;
pub use payload::LogData;
pub use schema::{require_app_id, validate_log};
pub use tag::Tag;
