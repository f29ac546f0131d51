use crate::BlogError;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Config file read when no explicit path is given. A missing file is not an error.
pub const DEFAULT_CONFIG_PATH: &str = "configs/default.toml";

/// Environment variables understood without the `BLOG_` prefix, and the
/// config keys they land on.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "openai.api_key"),
    ("AIRTABLE_API_KEY", "airtable.api_key"),
    ("AIRTABLE_BASE_ID", "airtable.base_id"),
    ("AIRTABLE_TABLE_NAME", "airtable.table_name"),
    ("EXCEL_FILE_PATH", "data.workbook_path"),
    ("GOOGLE_SHEET_ID", "sheets.sheet_id"),
    ("GOOGLE_CREDENTIALS_FILE", "sheets.credentials_file"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub openai: OpenAiConfig,
    pub airtable: AirtableConfig,
    pub sheets: SheetsConfig,
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_request_body_size_mb: u64,
    pub max_batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub workbook_path: String,
    pub output_dir: String,
    pub report_path: String,
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AirtableConfig {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub table_name: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SheetsConfig {
    pub sheet_id: Option<String>,
    pub credentials_file: String,
    pub base_url: String,
    pub token_url: String,
}

/// USD per 1,000 tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
                max_request_body_size_mb: 2,
                max_batch_size: 10,
            },
            data: DataConfig {
                workbook_path: "data/Key Insights.xlsx".to_string(),
                output_dir: "generated_blogs".to_string(),
                report_path: "MANAGER_REPORT.txt".to_string(),
            },
            openai: OpenAiConfig {
                api_key: None,
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o".to_string(),
                max_tokens: 4000,
                temperature: 0.7,
                request_timeout_secs: 120,
            },
            airtable: AirtableConfig {
                api_key: None,
                base_id: None,
                table_name: "Table 1".to_string(),
                base_url: "https://api.airtable.com/v0".to_string(),
            },
            sheets: SheetsConfig {
                sheet_id: None,
                credentials_file: "credentials.json".to_string(),
                base_url: "https://sheets.googleapis.com/v4".to_string(),
                token_url: "https://oauth2.googleapis.com/token".to_string(),
            },
            pricing: PricingConfig {
                input_per_1k: 0.005,
                output_per_1k: 0.015,
            },
            logging: LoggingConfig {
                format: LogFormat::Pretty,
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Layered sources, lowest precedence first: built-in defaults, the TOML
    /// file (when it exists), `BLOG_`-prefixed variables with `__` as the
    /// nesting separator, then the bare legacy variable names.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("BLOG_").split("__"));
        // taken verbatim: a table name or sheet id may look like a number
        for (name, key) in LEGACY_ENV {
            if let Ok(value) = std::env::var(name) {
                figment = figment.merge((*key, value));
            }
        }
        figment
    }

    pub fn load(path: Option<&Path>) -> Result<Self, BlogError> {
        Self::figment(path)
            .extract()
            .map_err(|e| BlogError::Config {
                reason: e.to_string(),
            })
    }

    pub fn body_limit_bytes(&self) -> usize {
        (self.server.max_request_body_size_mb * 1024 * 1024) as usize
    }
}

impl OpenAiConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl AirtableConfig {
    /// Both the token and the base id must be present for the sink to exist.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.api_key.as_deref(), self.base_id.as_deref()) {
            (Some(key), Some(base)) if !key.is_empty() && !base.is_empty() => Some((key, base)),
            _ => None,
        }
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    match secret {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}
