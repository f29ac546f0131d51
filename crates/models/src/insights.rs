use serde::{Deserialize, Serialize};

pub const SEO_KEYWORDS_SHEET: &str = "SEO - Keywords";
pub const LLM_KEYWORDS_SHEET: &str = "LLM - Keywords";
pub const WEBSITE_SHEET: &str = "Website";
pub const TOPICS_SHEET: &str = "key topics";

/// Number of keywords from each table that are fed into a prompt.
pub const PROMPT_KEYWORD_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeywordColumn {
    pub name: String,
    pub values: Vec<String>,
}

/// One keyword sheet. Columns are categories, kept in sheet order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeywordTable {
    pub columns: Vec<KeywordColumn>,
}

impl KeywordTable {
    pub fn new(columns: Vec<KeywordColumn>) -> Self {
        Self { columns }
    }

    /// Leading keywords of the first category.
    pub fn first_column(&self, limit: usize) -> Vec<String> {
        self.columns
            .first()
            .map(|c| c.values.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn category_count(&self) -> usize {
        self.columns.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebsiteLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    pub topic: String,
    pub description: String,
    pub source: String,
}

impl Topic {
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            topic: name.into(),
            description: "Custom topic provided by user".to_string(),
            source: "User input".to_string(),
        }
    }
}

/// Everything the generator needs from the workbook.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Insights {
    pub seo_keywords: KeywordTable,
    pub llm_keywords: KeywordTable,
    pub website_links: Vec<WebsiteLink>,
    pub topics: Vec<Topic>,
}

impl Insights {
    pub fn topic(&self, id: usize) -> Option<&Topic> {
        self.topics.get(id)
    }
}
