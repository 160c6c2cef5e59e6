//! Local append-only JSON file sink
//!
//! The file holds one JSON array. Each append reads it, pushes the record and
//! replaces the file through a rename, under a lock so concurrent requests
//! never lose each other's records. Existing entries are never rewritten.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RecordSink, SinkError};
use crate::config::LocalFileConfig;
use crate::record::StoredRecord;

#[derive(Debug)]
pub struct LocalFileSink {
    config: LocalFileConfig,
    lock: Mutex<()>,
}

impl LocalFileSink {
    pub fn new(config: LocalFileConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    async fn read_existing(&self) -> Result<Vec<serde_json::Value>, SinkError> {
        match tokio::fs::read(&self.config.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.config.path.display(), "no data file yet, creating one");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RecordSink for LocalFileSink {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn append(&self, record: &StoredRecord) -> Result<(), SinkError> {
        let _guard = self.lock.lock().await;

        if let Some(dir) = self.config.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        let mut records = self.read_existing().await?;
        records.push(serde_json::to_value(record)?);

        let tmp = self.config.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&records)?).await?;
        tokio::fs::rename(&tmp, &self.config.path).await?;

        tracing::info!(record_id = %record.id, total = records.len(), "record saved to local file");
        Ok(())
    }
}
