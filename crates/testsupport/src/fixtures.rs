use blog_models::{
    GeneratedBlog, Insights, KeywordColumn, KeywordTable, TokenUsage, Topic, WebsiteLink,
};
use serde_json::{json, Value};

pub const SAMPLE_CONTENT: &str = "META_TITLE: Edge AI Explained\n\
META_DESCRIPTION: How on-device models change latency and privacy.\n\
\n\
# Edge AI Explained\n\
\n\
Edge AI moves inference onto the device.\n\
\n\
## Conclusion\n\
\n\
Start small and measure.";

pub fn sample_insights() -> Insights {
    Insights {
        seo_keywords: KeywordTable::new(vec![KeywordColumn {
            name: "Primary".to_string(),
            values: ["ai content tools", "ai blog writer", "machine learning seo"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }]),
        llm_keywords: KeywordTable::new(vec![KeywordColumn {
            name: "Phrases".to_string(),
            values: vec!["what is generative ai".to_string()],
        }]),
        website_links: vec![
            WebsiteLink {
                name: "Home".to_string(),
                url: "https://example.com".to_string(),
            },
            WebsiteLink {
                name: "Blog".to_string(),
                url: "https://example.com/blog".to_string(),
            },
        ],
        topics: vec![
            Topic {
                topic: "Edge AI".to_string(),
                description: "Running models on devices".to_string(),
                source: "https://example.com/edge".to_string(),
            },
            Topic {
                topic: "AI Search".to_string(),
                description: "How answer engines cite sources".to_string(),
                source: String::new(),
            },
        ],
    }
}

pub fn sample_blog(topic: &str, cost: f64) -> GeneratedBlog {
    GeneratedBlog {
        topic: topic.to_string(),
        content: SAMPLE_CONTENT.to_string(),
        word_count: SAMPLE_CONTENT.split_whitespace().count(),
        model_used: "gpt-4o-2024-08-06".to_string(),
        usage: TokenUsage::new(1_250, 2_750),
        cost,
        seo_keywords_used: vec!["ai content tools".to_string(), "ai blog writer".to_string()],
        llm_keywords_used: vec!["what is generative ai".to_string()],
        links_used: vec!["Home".to_string()],
        generated_at: chrono::Utc::now(),
    }
}

/// Body of a successful `chat/completions` response.
pub fn completion_body(content: &str, prompt_tokens: u64, completion_tokens: u64) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-2024-08-06",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

/// Throwaway RSA key used to sign service-account assertions in tests.
pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/service_account_key.pem");

/// Writes a Google service-account key file and returns its path.
pub fn write_service_account(dir: &std::path::Path) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.join("credentials.json");
    let key = json!({
        "type": "service_account",
        "project_id": "blog-test",
        "private_key_id": "test-key",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "writer@blog-test.iam.gserviceaccount.com",
        "token_uri": "https://oauth2.googleapis.com/token"
    });
    std::fs::write(&path, serde_json::to_vec_pretty(&key)?)?;
    Ok(path)
}
