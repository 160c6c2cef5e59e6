//! HTTP gateway to the checkout API
//!
//! Posts the payload to `POST /api/save-form-data` and maps the
//! `{success, error}` reply onto [`SubmissionError`].

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::{ConfigurationError, SubmissionError};
use crate::submission::CheckoutGateway;
use crate::types::{CheckoutPayload, SubmitResponse};

/// Path of the submission endpoint relative to the API base URL
pub const SUBMIT_PATH: &str = "api/save-form-data";

/// Connection settings for [`HttpGateway`]
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Variables:
    /// - `CHECKOUT_API_URL` (required)
    /// - `CHECKOUT_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let raw = std::env::var("CHECKOUT_API_URL")
            .map_err(|_| ConfigurationError::Missing("CHECKOUT_API_URL".into()))?;
        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigurationError::Invalid("CHECKOUT_API_URL".into(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: std::env::var("CHECKOUT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigurationError> {
        let endpoint = config
            .base_url
            .join(SUBMIT_PATH)
            .map_err(|e| ConfigurationError::Invalid("CHECKOUT_API_URL".into(), e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigurationError::Invalid("http client".into(), e.to_string()))?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl CheckoutGateway for HttpGateway {
    async fn submit(&self, payload: &CheckoutPayload) -> Result<(), SubmissionError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(format!("Failed to save data: {}", e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SubmissionError::Transport(format!("Failed to save data: {}", e)))?;

        let parsed: Option<SubmitResponse> = serde_json::from_slice(&body).ok();
        match parsed {
            Some(reply) if status.is_success() && reply.success => Ok(()),
            Some(SubmitResponse {
                error: Some(error), ..
            }) => Err(SubmissionError::Rejected(error)),
            _ => Err(SubmissionError::Transport(format!(
                "Failed to save data (status {})",
                status.as_u16()
            ))),
        }
    }
}
