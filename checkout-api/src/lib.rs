//! HTTP API for checkout submissions
//!
//! Receives completed checkout forms and appends a truncated record to a
//! Google Sheet, an Excel workbook table or a local JSON file.

pub mod config;
pub mod record;
pub mod routes;
pub mod sink;

pub use config::{AppConfig, SinkConfig};
pub use record::StoredRecord;
pub use routes::{router, AppState};
pub use sink::{build_sink, RecordSink, SinkError};
