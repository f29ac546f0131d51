use crate::BlogSink;
use async_trait::async_trait;
use blog_models::{with_thousands, AirtableConfig, BlogError, GeneratedBlog};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

#[derive(Debug, Deserialize)]
struct CreatedRecords {
    records: Vec<CreatedRecord>,
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    id: String,
}

/// Stores one record per blog in an Airtable table.
pub struct AirtableSink {
    client: Client,
    table_url: String,
    api_key: String,
}

impl AirtableSink {
    /// `None` when the token or base id is missing.
    pub fn from_config(config: &AirtableConfig) -> Option<Self> {
        let Some((api_key, base_id)) = config.credentials() else {
            warn!("Missing Airtable credentials, Airtable publishing disabled");
            return None;
        };
        Some(Self {
            client: Client::new(),
            table_url: format!(
                "{}/{}/{}",
                config.base_url.trim_end_matches('/'),
                base_id,
                config.table_name
            ),
            api_key: api_key.to_string(),
        })
    }

    /// Fields written for a blog. The table only needs `Name` and `Notes`.
    pub fn record_fields(blog: &GeneratedBlog) -> Value {
        let generated = blog
            .generated_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S");
        json!({
            "Name": blog.topic,
            "Notes": format!(
                "Generated: {} | Model: {} | Tokens: {} | Cost: ${:.4}",
                generated,
                blog.model_used,
                with_thousands(blog.usage.total_tokens),
                blog.cost
            ),
        })
    }

    async fn error_from(response: reqwest::Response) -> BlogError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        BlogError::Airtable {
            reason: format!("{status} - {body}"),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_record(&self, record_id: &str) -> Result<(), BlogError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.table_url, record_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| BlogError::Airtable {
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl BlogSink for AirtableSink {
    fn name(&self) -> &'static str {
        "airtable"
    }

    #[instrument(skip(self, blog), fields(topic = %blog.topic))]
    async fn publish(&self, blog: &GeneratedBlog) -> Result<String, BlogError> {
        let body = json!({ "records": [{ "fields": Self::record_fields(blog) }] });
        let response = self
            .client
            .post(&self.table_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BlogError::Airtable {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let err = Self::error_from(response).await;
            error!(error = %err, "Airtable write failed");
            return Err(err);
        }

        let created: CreatedRecords = response.json().await.map_err(|e| BlogError::Airtable {
            reason: format!("invalid response body: {e}"),
        })?;
        let record_id = created
            .records
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| BlogError::Airtable {
                reason: "no record returned".to_string(),
            })?;
        info!(record_id = %record_id, "Blog saved to Airtable");
        Ok(record_id)
    }

    async fn test_connection(&self) -> bool {
        let response = match self
            .client
            .get(&self.table_url)
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Airtable connection error");
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Airtable connection failed");
            return false;
        }

        let existing = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v["records"].as_array().map(Vec::len))
            .unwrap_or(0);
        info!(existing_records = existing, "Airtable connection successful");
        true
    }
}
