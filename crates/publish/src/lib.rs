pub mod airtable;
pub mod meta;
pub mod sheets;

pub use airtable::AirtableSink;
pub use meta::*;
pub use sheets::{SheetsSink, SHEET_HEADERS};

use async_trait::async_trait;
use blog_models::{BlogError, BlogOutcome, Config, GeneratedBlog};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// A destination that stores generated posts.
#[async_trait]
pub trait BlogSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Stores the post and returns a sink-specific reference (record id, range).
    async fn publish(&self, blog: &GeneratedBlog) -> Result<String, BlogError>;

    async fn test_connection(&self) -> bool;
}

/// Result of writing one post to one sink.
#[derive(Debug)]
pub struct SinkWrite {
    pub sink: &'static str,
    pub result: Result<String, BlogError>,
}

#[derive(Clone, Default)]
pub struct Publisher {
    sinks: Vec<Arc<dyn BlogSink>>,
}

impl Publisher {
    pub fn new(sinks: Vec<Arc<dyn BlogSink>>) -> Self {
        Self { sinks }
    }

    /// Builds every sink that has credentials. Unconfigured sinks are skipped.
    pub fn from_config(config: &Config) -> Self {
        let mut sinks: Vec<Arc<dyn BlogSink>> = Vec::new();
        if let Some(airtable) = AirtableSink::from_config(&config.airtable) {
            sinks.push(Arc::new(airtable));
        }
        if let Some(sheets) = SheetsSink::from_config(&config.sheets) {
            sinks.push(Arc::new(sheets));
        }
        info!(
            sinks = ?sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "Publisher configured"
        );
        Self { sinks }
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn sink(&self, name: &str) -> Option<&Arc<dyn BlogSink>> {
        self.sinks.iter().find(|s| s.name() == name)
    }

    /// Writes to every sink. A failing sink never stops the others.
    pub async fn publish_all(&self, blog: &GeneratedBlog) -> Vec<SinkWrite> {
        let mut writes = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            let result = sink.publish(blog).await;
            if let Err(e) = &result {
                warn!(sink = sink.name(), topic = %blog.topic, error = %e, "Publish failed");
            }
            writes.push(SinkWrite {
                sink: sink.name(),
                result,
            });
        }
        writes
    }

    /// Publishes the successful outcomes; returns successful writes per sink.
    pub async fn publish_many(&self, outcomes: &[BlogOutcome]) -> BTreeMap<&'static str, usize> {
        let mut written: BTreeMap<&'static str, usize> =
            self.sinks.iter().map(|s| (s.name(), 0)).collect();
        for blog in outcomes.iter().filter_map(BlogOutcome::blog) {
            for write in self.publish_all(blog).await {
                if write.result.is_ok() {
                    *written.entry(write.sink).or_default() += 1;
                }
            }
        }
        for (sink, count) in &written {
            info!(sink, count, "Batch published");
        }
        written
    }

    /// Checks every sink connection.
    pub async fn test_connections(&self) -> Vec<(&'static str, bool)> {
        let mut statuses = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            statuses.push((sink.name(), sink.test_connection().await));
        }
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        name: &'static str,
        fail: bool,
        calls: AtomicUsize,
    }

    impl CountingSink {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl BlogSink for CountingSink {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn publish(&self, blog: &GeneratedBlog) -> Result<String, BlogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(BlogError::Airtable {
                    reason: "boom".to_string(),
                })
            } else {
                Ok(format!("{}:{}", self.name, blog.topic))
            }
        }

        async fn test_connection(&self) -> bool {
            !self.fail
        }
    }

    fn erased(sink: &Arc<CountingSink>) -> Arc<dyn BlogSink> {
        sink.clone()
    }

    fn blog(topic: &str) -> GeneratedBlog {
        GeneratedBlog {
            topic: topic.to_string(),
            content: "body".to_string(),
            word_count: 1,
            model_used: "gpt-4o".to_string(),
            usage: blog_models::TokenUsage::new(10, 20),
            cost: 0.001,
            seo_keywords_used: vec![],
            llm_keywords_used: vec![],
            links_used: vec![],
            generated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_others() {
        let good = CountingSink::new("good", false);
        let bad = CountingSink::new("bad", true);
        let publisher = Publisher::new(vec![erased(&bad), erased(&good)]);

        let writes = publisher.publish_all(&blog("Edge AI")).await;
        assert_eq!(writes.len(), 2);
        assert!(writes[0].result.is_err());
        assert_eq!(writes[1].result.as_deref().unwrap(), "good:Edge AI");
        assert_eq!(good.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn publish_many_skips_failed_outcomes() {
        let good = CountingSink::new("good", false);
        let bad = CountingSink::new("bad", true);
        let publisher = Publisher::new(vec![erased(&good), erased(&bad)]);

        let outcomes = vec![
            BlogOutcome::Success(blog("one")),
            BlogOutcome::Failed {
                topic: "two".to_string(),
                error: "upstream".to_string(),
            },
            BlogOutcome::Success(blog("three")),
        ];
        let written = publisher.publish_many(&outcomes).await;

        assert_eq!(written["good"], 2);
        assert_eq!(written["bad"], 0);
        assert_eq!(bad.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn connection_statuses_follow_sink_order() {
        let publisher = Publisher::new(vec![
            erased(&CountingSink::new("a", false)),
            erased(&CountingSink::new("b", true)),
        ]);
        assert_eq!(
            publisher.test_connections().await,
            vec![("a", true), ("b", false)]
        );
        assert!(publisher.sink("b").is_some());
        assert!(Publisher::default().is_empty());
    }
}
