//! Google Sheets sink
//!
//! Calls `POST /v4/spreadsheets/{id}/values/{range}:append` with
//! `USER_ENTERED` input and `INSERT_ROWS`, one row per record.

use async_trait::async_trait;
use checkout_form::ConfigurationError;
use serde_json::json;

use super::{http_client, snippet, RecordSink, SinkError};
use crate::config::SheetsConfig;
use crate::record::StoredRecord;

#[derive(Debug, Clone)]
pub struct SheetsSink {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsSink {
    pub fn new(config: SheetsConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            http: http_client(config.timeout_secs)?,
            config,
        })
    }

    fn append_url(&self) -> Result<url::Url, SinkError> {
        let path = format!(
            "v4/spreadsheets/{}/values/{}:append",
            self.config.spreadsheet_id, self.config.range
        );
        self.config.api_url.join(&path).map_err(|e| SinkError::Api {
            endpoint: path,
            status: 0,
            body: e.to_string(),
        })
    }
}

#[async_trait]
impl RecordSink for SheetsSink {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn append(&self, record: &StoredRecord) -> Result<(), SinkError> {
        let url = self.append_url()?;
        let endpoint = url.path().to_string();
        let body = json!({ "values": [record.sheet_row()] });

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.access_token)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await
            .map_err(|source| SinkError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(SinkError::Api {
                endpoint,
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        tracing::info!(record_id = %record.id, "row appended to spreadsheet");
        Ok(())
    }
}
