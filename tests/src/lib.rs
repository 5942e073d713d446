//! Shared harness for the log server's integration tests.

pub mod fixtures;
pub mod setup;
