use crate::{extract_meta, BlogSink};
use async_trait::async_trait;
use blog_models::{BlogError, GeneratedBlog, SheetsConfig};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

pub const SHEET_HEADERS: [&str; 11] = [
    "Timestamp",
    "Topic",
    "Meta Title",
    "Meta Description",
    "Blog Content",
    "Word Count",
    "SEO Keywords Used",
    "LLM Keywords Used",
    "Website Links Used",
    "Generation Status",
    "Notes",
];

/// Fields we need from a Google service-account key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, BlogError> {
        let raw = std::fs::read_to_string(path).map_err(|e| BlogError::Sheets {
            reason: format!("cannot read credentials file {}: {e}", path.display()),
        })?;
        serde_json::from_str(&raw).map_err(|e| BlogError::Sheets {
            reason: format!("invalid service account file: {e}"),
        })
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Appends one row per blog to a Google spreadsheet.
pub struct SheetsSink {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    spreadsheet_url: String,
    token_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsSink {
    pub fn new(config: &SheetsConfig) -> Result<Self, BlogError> {
        let sheet_id = config
            .sheet_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BlogError::Config {
                reason: "GOOGLE_SHEET_ID is not set".to_string(),
            })?;
        let key = ServiceAccountKey::from_file(Path::new(&config.credentials_file))?;
        let encoding_key =
            EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| BlogError::Sheets {
                reason: format!("invalid service account private key: {e}"),
            })?;

        Ok(Self {
            client: Client::new(),
            key,
            encoding_key,
            spreadsheet_url: format!(
                "{}/spreadsheets/{}",
                config.base_url.trim_end_matches('/'),
                sheet_id
            ),
            token_url: config.token_url.clone(),
            token: Mutex::new(None),
        })
    }

    /// `None` when the sheet id is unset or the credentials cannot be loaded.
    pub fn from_config(config: &SheetsConfig) -> Option<Self> {
        config.sheet_id.as_ref()?;
        match Self::new(config) {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!(error = %e, "Google Sheets publishing disabled");
                None
            }
        }
    }

    fn sign_assertion(&self) -> Result<String, BlogError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.token_url,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            BlogError::Sheets {
                reason: format!("failed to sign assertion: {e}"),
            }
        })
    }

    async fn access_token(&self) -> Result<String, BlogError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.sign_assertion()?;
        let response = self
            .client
            .post(&self.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| BlogError::Sheets {
                reason: format!("token request failed: {e}"),
            })?;
        let response = ensure_success(response, "token exchange").await?;
        let token: TokenResponse = response.json().await.map_err(|e| BlogError::Sheets {
            reason: format!("invalid token response: {e}"),
        })?;
        debug!(expires_in = token.expires_in, "Obtained Sheets access token");

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    /// Clears the sheet and writes the header row.
    #[instrument(skip(self))]
    pub async fn setup_headers(&self) -> Result<(), BlogError> {
        let token = self.access_token().await?;

        let clear = self
            .client
            .post(format!("{}/values/A1:Z1000:clear", self.spreadsheet_url))
            .bearer_auth(&token)
            .json(&json!({}))
            .send()
            .await
            .map_err(request_error)?;
        ensure_success(clear, "clear").await?;

        let update = self
            .client
            .put(format!("{}/values/A1", self.spreadsheet_url))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&token)
            .json(&json!({ "values": [SHEET_HEADERS] }))
            .send()
            .await
            .map_err(request_error)?;
        ensure_success(update, "header update").await?;

        info!("Sheet headers created");
        Ok(())
    }

    /// One spreadsheet row, in `SHEET_HEADERS` order.
    pub fn row_for(blog: &GeneratedBlog) -> Vec<Value> {
        let meta = extract_meta(&blog.content);
        vec![
            json!(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            json!(blog.topic),
            json!(meta.meta_title),
            json!(meta.meta_description),
            json!(blog.content),
            json!(blog.word_count),
            json!(blog.seo_keywords_used.join(", ")),
            json!(blog.llm_keywords_used.join(", ")),
            json!(blog.links_used.join(", ")),
            json!("success"),
            json!(""),
        ]
    }
}

fn request_error(e: reqwest::Error) -> BlogError {
    BlogError::Sheets {
        reason: e.to_string(),
    }
}

async fn ensure_success(
    response: reqwest::Response,
    step: &str,
) -> Result<reqwest::Response, BlogError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(BlogError::Sheets {
        reason: format!("{step} failed: {status} - {body}"),
    })
}

#[async_trait]
impl BlogSink for SheetsSink {
    fn name(&self) -> &'static str {
        "sheets"
    }

    #[instrument(skip(self, blog), fields(topic = %blog.topic))]
    async fn publish(&self, blog: &GeneratedBlog) -> Result<String, BlogError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(format!("{}/values/A2:append", self.spreadsheet_url))
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .bearer_auth(&token)
            .json(&json!({ "values": [Self::row_for(blog)] }))
            .send()
            .await
            .map_err(request_error)?;

        let response = match ensure_success(response, "append").await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Failed to write to Google Sheets");
                return Err(e);
            }
        };

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let range = body["updates"]["updatedRange"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        info!(range = %range, "Blog saved to Google Sheets");
        Ok(range)
    }

    async fn test_connection(&self) -> bool {
        let token = match self.access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Google Sheets authentication failed");
                return false;
            }
        };
        let response = match self
            .client
            .get(&self.spreadsheet_url)
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(status = %response.status(), "Google Sheets connection failed");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Google Sheets connection error");
                return false;
            }
        };

        let title = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v["properties"]["title"].as_str().map(str::to_string))
            .unwrap_or_else(|| "Unknown".to_string());
        info!(title = %title, "Connected to Google Sheets");
        true
    }
}
