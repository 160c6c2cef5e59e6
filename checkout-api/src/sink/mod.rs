//! Record sinks
//!
//! Every backend appends one [`StoredRecord`] per accepted submission. None of
//! them attach an idempotency key, so a retried request can produce a
//! duplicate row.

mod local;
mod sheets;
mod workbook;

pub use local::LocalFileSink;
pub use sheets::SheetsSink;
pub use workbook::WorkbookSink;

use async_trait::async_trait;
use checkout_form::ConfigurationError;
use std::sync::Arc;

use crate::config::SinkConfig;
use crate::record::StoredRecord;

/// Failure while appending a record
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("failed to authenticate: {0}")]
    Auth(String),
    #[error("local data file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON in local data file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Append-only destination for stored records
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn append(&self, record: &StoredRecord) -> Result<(), SinkError>;
}

/// Build the sink selected by configuration
pub fn build_sink(config: &SinkConfig) -> Result<Arc<dyn RecordSink>, ConfigurationError> {
    Ok(match config {
        SinkConfig::Sheets(cfg) => Arc::new(SheetsSink::new(cfg.clone())?),
        SinkConfig::Workbook(cfg) => Arc::new(WorkbookSink::new(cfg.clone())?),
        SinkConfig::LocalFile(cfg) => Arc::new(LocalFileSink::new(cfg.clone())),
    })
}

/// First 200 bytes of a response body, for error messages
pub(crate) fn snippet(body: &[u8]) -> String {
    String::from_utf8_lossy(&body[..body.len().min(200)]).into_owned()
}

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ConfigurationError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ConfigurationError::Invalid("http client".into(), e.to_string()))
}
