//! Request middleware.

pub mod network;

pub use network::{access_log, simulate_rtt};
