//! HTTP API layer for the log server.

pub mod admission;
pub mod middleware;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod state;

pub use admission::{AdmissionConfig, AdmissionGate, AdmissionPermit};
pub use pipeline::{BulkReport, Ingestor};
pub use routes::router;
pub use state::AppState;
