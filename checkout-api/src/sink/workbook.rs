//! Excel workbook sink via Microsoft Graph
//!
//! Authenticates with the client-credentials grant and inserts one row into
//! a workbook table per record. The access token is cached until shortly
//! before it expires.

use async_trait::async_trait;
use checkout_form::ConfigurationError;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::{http_client, snippet, RecordSink, SinkError};
use crate::config::WorkbookConfig;
use crate::record::StoredRecord;

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Refresh this long before the token's stated expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct WorkbookSink {
    http: reqwest::Client,
    config: WorkbookConfig,
    token: Mutex<Option<CachedToken>>,
}

impl WorkbookSink {
    pub fn new(config: WorkbookConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            http: http_client(config.timeout_secs)?,
            config,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, SinkError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let path = format!("{}/oauth2/v2.0/token", self.config.tenant_id);
        let url = self
            .config
            .login_url
            .join(&path)
            .map_err(|e| SinkError::Auth(e.to_string()))?;
        let response = self
            .http
            .post(url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("scope", GRAPH_SCOPE),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|source| SinkError::Http {
                endpoint: path.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SinkError::Auth(format!(
                "token endpoint answered {}: {}",
                status.as_u16(),
                snippet(&body)
            )));
        }
        let token: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| SinkError::Auth(format!("invalid token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        tracing::debug!("acquired Graph access token");
        Ok(token.access_token)
    }

    fn rows_path(&self) -> String {
        format!(
            "sites/{}/drives/{}/items/{}/workbook/tables/{}/rows",
            self.config.site_id, self.config.drive_id, self.config.item_id, self.config.table
        )
    }
}

#[async_trait]
impl RecordSink for WorkbookSink {
    fn name(&self) -> &'static str {
        "workbook"
    }

    async fn append(&self, record: &StoredRecord) -> Result<(), SinkError> {
        let token = self.access_token().await?;
        let endpoint = self.rows_path();
        let url = self.config.graph_url.join(&endpoint).map_err(|e| SinkError::Api {
            endpoint: endpoint.clone(),
            status: 0,
            body: e.to_string(),
        })?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [record.table_row()] }))
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

        tracing::info!(record_id = %record.id, "row added to workbook table");
        Ok(())
    }
}
