//! Server and record sink configuration.
//!
//! Everything is read once at startup and injected into the sink it
//! configures. Missing values are a [`ConfigurationError`] and stop the
//! server before it binds.

use checkout_form::ConfigurationError;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Which backend receives records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Sheets,
    Workbook,
    LocalFile,
}

impl SinkKind {
    fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sheets" | "google" => Ok(SinkKind::Sheets),
            "workbook" | "excel" | "graph" => Ok(SinkKind::Workbook),
            "local" | "file" => Ok(SinkKind::LocalFile),
            other => Err(ConfigurationError::Invalid(
                "RECORD_SINK".into(),
                format!("unknown sink '{}' (expected sheets, workbook or local)", other),
            )),
        }
    }
}

/// Google Sheets values-append settings
#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// OAuth bearer token with the spreadsheets scope
    pub access_token: String,
    pub range: String,
    pub api_url: Url,
    pub timeout_secs: u64,
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[REDACTED]")
            .field("range", &self.range)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Microsoft Graph workbook table settings
#[derive(Clone)]
pub struct WorkbookConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub site_id: String,
    pub drive_id: String,
    pub item_id: String,
    pub table: String,
    pub graph_url: Url,
    pub login_url: Url,
    pub timeout_secs: u64,
}

impl fmt::Debug for WorkbookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkbookConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("site_id", &self.site_id)
            .field("drive_id", &self.drive_id)
            .field("item_id", &self.item_id)
            .field("table", &self.table)
            .field("graph_url", &self.graph_url)
            .field("login_url", &self.login_url)
            .finish()
    }
}

/// Append-only JSON file settings
#[derive(Debug, Clone)]
pub struct LocalFileConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub enum SinkConfig {
    Sheets(SheetsConfig),
    Workbook(WorkbookConfig),
    LocalFile(LocalFileConfig),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub sink: SinkConfig,
}

impl AppConfig {
    /// Variables:
    /// - `API_PORT` (default: 4001)
    /// - `RECORD_SINK`: `sheets` (default), `workbook` or `local`
    /// - sheets: `GOOGLE_SPREADSHEET_ID`, `GOOGLE_ACCESS_TOKEN` (required),
    ///   `GOOGLE_SHEETS_RANGE` (default `A:E`), `GOOGLE_SHEETS_API_URL`
    /// - workbook: `MICROSOFT_TENANT_ID`, `MICROSOFT_CLIENT_ID`,
    ///   `MICROSOFT_CLIENT_SECRET`, `MICROSOFT_SITE_ID`, `MICROSOFT_DRIVE_ID`,
    ///   `MICROSOFT_ITEM_ID` (required), `MICROSOFT_TABLE` (default `Table1`),
    ///   `MICROSOFT_GRAPH_URL`, `MICROSOFT_LOGIN_URL`
    /// - local: `LOCAL_DATA_PATH` (default `data/form-data.json`)
    /// - `SINK_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);
        let port = match env.optional("API_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigurationError::Invalid("API_PORT".into(), e.to_string()))?,
            None => 4001,
        };
        let timeout_secs = env
            .optional("SINK_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let kind = match env.optional("RECORD_SINK") {
            Some(raw) => SinkKind::parse(&raw)?,
            None => SinkKind::Sheets,
        };

        let sink = match kind {
            SinkKind::Sheets => SinkConfig::Sheets(SheetsConfig {
                spreadsheet_id: env.required("GOOGLE_SPREADSHEET_ID")?,
                access_token: env.required("GOOGLE_ACCESS_TOKEN")?,
                range: env
                    .optional("GOOGLE_SHEETS_RANGE")
                    .unwrap_or_else(|| "A:E".to_string()),
                api_url: env.url("GOOGLE_SHEETS_API_URL", "https://sheets.googleapis.com/")?,
                timeout_secs,
            }),
            SinkKind::Workbook => SinkConfig::Workbook(WorkbookConfig {
                tenant_id: env.required("MICROSOFT_TENANT_ID")?,
                client_id: env.required("MICROSOFT_CLIENT_ID")?,
                client_secret: env.required("MICROSOFT_CLIENT_SECRET")?,
                site_id: env.required("MICROSOFT_SITE_ID")?,
                drive_id: env.required("MICROSOFT_DRIVE_ID")?,
                item_id: env.required("MICROSOFT_ITEM_ID")?,
                table: env
                    .optional("MICROSOFT_TABLE")
                    .unwrap_or_else(|| "Table1".to_string()),
                graph_url: env.url("MICROSOFT_GRAPH_URL", "https://graph.microsoft.com/v1.0/")?,
                login_url: env.url("MICROSOFT_LOGIN_URL", "https://login.microsoftonline.com/")?,
                timeout_secs,
            }),
            SinkKind::LocalFile => SinkConfig::LocalFile(LocalFileConfig {
                path: env
                    .optional("LOCAL_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data/form-data.json")),
            }),
        };

        Ok(Self { port, sink })
    }
}

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigurationError> {
        self.optional(key)
            .ok_or_else(|| ConfigurationError::Missing(key.to_string()))
    }

    fn url(&self, key: &str, default: &str) -> Result<Url, ConfigurationError> {
        let raw = self.optional(key).unwrap_or_else(|| default.to_string());
        Url::parse(&raw).map_err(|e| ConfigurationError::Invalid(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigurationError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn sheets_is_default_and_needs_credentials() {
        let err = config(&[]).unwrap_err();
        assert_eq!(err, ConfigurationError::Missing("GOOGLE_SPREADSHEET_ID".into()));

        let cfg = config(&[
            ("GOOGLE_SPREADSHEET_ID", "sheet-1"),
            ("GOOGLE_ACCESS_TOKEN", "secret-token"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 4001);
        match cfg.sink {
            SinkConfig::Sheets(sheets) => {
                assert_eq!(sheets.range, "A:E");
                assert_eq!(sheets.api_url.as_str(), "https://sheets.googleapis.com/");
                assert!(!format!("{:?}", sheets).contains("secret-token"));
            }
            other => panic!("expected sheets sink, got {:?}", other),
        }
    }

    #[test]
    fn workbook_requires_every_identifier() {
        let err = config(&[
            ("RECORD_SINK", "workbook"),
            ("MICROSOFT_TENANT_ID", "t"),
            ("MICROSOFT_CLIENT_ID", "c"),
            ("MICROSOFT_CLIENT_SECRET", "s"),
            ("MICROSOFT_SITE_ID", "site"),
            ("MICROSOFT_DRIVE_ID", "drive"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigurationError::Missing("MICROSOFT_ITEM_ID".into()));
    }

    #[test]
    fn local_sink_has_default_path() {
        let cfg = config(&[("RECORD_SINK", "local"), ("API_PORT", "8080")]).unwrap();
        assert_eq!(cfg.port, 8080);
        match cfg.sink {
            SinkConfig::LocalFile(local) => {
                assert_eq!(local.path, PathBuf::from("data/form-data.json"))
            }
            other => panic!("expected local sink, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_sink_and_bad_port() {
        assert!(matches!(
            config(&[("RECORD_SINK", "postgres")]),
            Err(ConfigurationError::Invalid(ref k, _)) if k == "RECORD_SINK"
        ));
        assert!(matches!(
            config(&[("RECORD_SINK", "local"), ("API_PORT", "http")]),
            Err(ConfigurationError::Invalid(ref k, _)) if k == "API_PORT"
        ));
    }
}
