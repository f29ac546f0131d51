use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedBlog {
    pub topic: String,
    pub content: String,
    pub word_count: usize,
    pub model_used: String,
    pub usage: TokenUsage,
    pub cost: f64,
    pub seo_keywords_used: Vec<String>,
    pub llm_keywords_used: Vec<String>,
    pub links_used: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Success,
    Failed,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Success => "success",
            BlogStatus::Failed => "failed",
        }
    }
}

/// Result of one generation attempt. Failures are values, not errors, so a
/// batch keeps going past a bad topic.
#[derive(Debug, Clone, PartialEq)]
pub enum BlogOutcome {
    Success(GeneratedBlog),
    Failed { topic: String, error: String },
}

impl BlogOutcome {
    pub fn topic(&self) -> &str {
        match self {
            BlogOutcome::Success(blog) => &blog.topic,
            BlogOutcome::Failed { topic, .. } => topic,
        }
    }

    pub fn status(&self) -> BlogStatus {
        match self {
            BlogOutcome::Success(_) => BlogStatus::Success,
            BlogOutcome::Failed { .. } => BlogStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BlogOutcome::Success(_))
    }

    pub fn blog(&self) -> Option<&GeneratedBlog> {
        match self {
            BlogOutcome::Success(blog) => Some(blog),
            BlogOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BlogOutcome::Success(_) => None,
            BlogOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn cost(&self) -> f64 {
        self.blog().map(|b| b.cost).unwrap_or(0.0)
    }
}

/// Rounds to four decimal places, the precision costs are reported at.
pub fn round_cost(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Renders an integer with `,` thousands separators.
pub fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
