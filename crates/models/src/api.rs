use crate::{round_cost, BlogOutcome, GeneratedBlog, KeywordColumn, KeywordTable, Topic};
use chrono::{DateTime, Utc};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// Request/Response types for the HTTP API

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicSummary {
    pub id: usize,
    pub topic: String,
    pub description: String,
    pub source: String,
}

impl TopicSummary {
    pub fn from_topic(id: usize, topic: &Topic) -> Self {
        Self {
            id,
            topic: topic.topic.clone(),
            description: topic.description.clone(),
            source: topic.source.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicsResponse {
    pub topics: Vec<TopicSummary>,
    pub count: usize,
}

/// Keyword columns as a JSON object `{column: [values]}` in sheet order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordColumns(pub Vec<KeywordColumn>);

impl KeywordColumns {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|c| c.name.as_str()).collect()
    }
}

impl From<&KeywordTable> for KeywordColumns {
    fn from(table: &KeywordTable) -> Self {
        Self(table.columns.clone())
    }
}

impl Serialize for KeywordColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for column in &self.0 {
            map.serialize_entry(&column.name, &column.values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeywordColumns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColumnsVisitor;

        impl<'de> Visitor<'de> for ColumnsVisitor {
            type Value = KeywordColumns;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column name to keyword list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut columns = Vec::new();
                while let Some((name, values)) = access.next_entry::<String, Vec<String>>()? {
                    columns.push(KeywordColumn { name, values });
                }
                Ok(KeywordColumns(columns))
            }
        }

        deserializer.deserialize_map(ColumnsVisitor)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsResponse {
    pub seo_keywords: KeywordColumns,
    pub llm_keywords: KeywordColumns,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateBlogRequest {
    #[serde(default)]
    pub topic_id: Option<usize>,
    #[serde(default)]
    pub custom_topic: Option<String>,
    /// Accepted in any shape for client compatibility; keyword choice comes
    /// from the workbook.
    #[serde(default, skip_serializing)]
    pub selected_keywords: Option<IgnoredAny>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPayload {
    pub topic: String,
    pub content: String,
    pub word_count: usize,
    pub model_used: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub cost: f64,
    pub seo_keywords_used: Vec<String>,
    pub llm_keywords_used: Vec<String>,
    pub links_used: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl From<&GeneratedBlog> for BlogPayload {
    fn from(blog: &GeneratedBlog) -> Self {
        Self {
            topic: blog.topic.clone(),
            content: blog.content.clone(),
            word_count: blog.word_count,
            model_used: blog.model_used.clone(),
            input_tokens: blog.usage.input_tokens,
            output_tokens: blog.usage.output_tokens,
            total_tokens: blog.usage.total_tokens,
            cost: blog.cost,
            seo_keywords_used: blog.seo_keywords_used.clone(),
            llm_keywords_used: blog.llm_keywords_used.clone(),
            links_used: blog.links_used.clone(),
            generated_at: blog.generated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateBlogResponse {
    pub status: String,
    pub blog: BlogPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationFailedResponse {
    pub status: String,
    pub error: String,
}

fn default_batch_count() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMultipleRequest {
    #[serde(default = "default_batch_count")]
    pub count: usize,
    #[serde(default)]
    pub topic_ids: Vec<usize>,
}

impl Default for GenerateMultipleRequest {
    fn default() -> Self {
        Self {
            count: default_batch_count(),
            topic_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchItem {
    pub index: usize,
    pub topic: String,
    pub status: String,
    pub word_count: usize,
    pub cost: f64,
    pub tokens: u64,
    pub error: String,
}

impl BatchItem {
    pub fn from_outcome(index: usize, outcome: &BlogOutcome) -> Self {
        let blog = outcome.blog();
        Self {
            index,
            topic: outcome.topic().to_string(),
            status: outcome.status().as_str().to_string(),
            word_count: blog.map(|b| b.word_count).unwrap_or(0),
            cost: outcome.cost(),
            tokens: blog.map(|b| b.usage.total_tokens).unwrap_or(0),
            error: outcome.error().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    pub total_requested: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_cost: f64,
    pub average_cost: f64,
}

impl BatchSummary {
    pub fn from_outcomes(total_requested: usize, outcomes: &[BlogOutcome]) -> Self {
        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        let total_cost: f64 = outcomes.iter().map(BlogOutcome::cost).sum();
        let average_cost = if successful > 0 {
            round_cost(total_cost / successful as f64)
        } else {
            0.0
        };
        Self {
            total_requested,
            successful,
            failed: total_requested.saturating_sub(successful),
            total_cost: round_cost(total_cost),
            average_cost,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMultipleResponse {
    pub status: String,
    pub summary: BatchSummary,
    pub results: Vec<BatchItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub available_topics: usize,
    pub seo_categories: usize,
    pub llm_categories: usize,
    pub website_links: usize,
    pub openai_connected: bool,
    pub airtable_connected: bool,
}
