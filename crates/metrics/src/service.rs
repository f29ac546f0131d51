use blog_models::{BlogError, BlogOutcome};
use prometheus::{
    Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::time::Duration;
use tracing::{debug, instrument};

fn internal(e: impl std::fmt::Display) -> BlogError {
    BlogError::Internal {
        reason: e.to_string(),
    }
}

pub struct MetricsService {
    registry: Registry,
    generated_total: Counter,
    failed_total: Counter,
    publish_failures_total: CounterVec,
    tokens_total: CounterVec,
    cost_usd_total: Counter,
    generation_duration_seconds: Histogram,
}

impl MetricsService {
    pub fn new() -> Result<Self, BlogError> {
        let registry = Registry::new();

        let generated_total = Counter::new("blog_generated_total", "Total number of blogs generated")
            .map_err(internal)?;
        let failed_total = Counter::new(
            "blog_failed_total",
            "Total number of failed blog generations",
        )
        .map_err(internal)?;
        let publish_failures_total = CounterVec::new(
            Opts::new(
                "blog_publish_failures_total",
                "Total number of failed writes to a publishing sink",
            ),
            &["sink"],
        )
        .map_err(internal)?;
        let tokens_total = CounterVec::new(
            Opts::new("blog_tokens_total", "Total number of OpenAI tokens used"),
            &["kind"],
        )
        .map_err(internal)?;
        let cost_usd_total = Counter::new(
            "blog_cost_usd_total",
            "Total estimated OpenAI spend in USD",
        )
        .map_err(internal)?;
        let generation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "blog_generation_duration_seconds",
                "Time spent generating one blog",
            )
            .buckets(vec![1.0, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]),
        )
        .map_err(internal)?;

        registry
            .register(Box::new(generated_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(failed_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(publish_failures_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(tokens_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(cost_usd_total.clone()))
            .map_err(internal)?;
        registry
            .register(Box::new(generation_duration_seconds.clone()))
            .map_err(internal)?;

        Ok(Self {
            registry,
            generated_total,
            failed_total,
            publish_failures_total,
            tokens_total,
            cost_usd_total,
            generation_duration_seconds,
        })
    }

    #[instrument(skip(self, outcome), fields(topic = %outcome.topic()))]
    pub fn record_outcome(&self, outcome: &BlogOutcome, elapsed: Duration) {
        self.generation_duration_seconds
            .observe(elapsed.as_secs_f64());
        match outcome {
            BlogOutcome::Success(blog) => {
                self.generated_total.inc();
                self.tokens_total
                    .with_label_values(&["input"])
                    .inc_by(blog.usage.input_tokens as f64);
                self.tokens_total
                    .with_label_values(&["output"])
                    .inc_by(blog.usage.output_tokens as f64);
                self.cost_usd_total.inc_by(blog.cost.max(0.0));
            }
            BlogOutcome::Failed { .. } => self.failed_total.inc(),
        }
        debug!(success = outcome.is_success(), "Recorded generation");
    }

    pub fn record_publish_failure(&self, sink: &str) {
        self.publish_failures_total.with_label_values(&[sink]).inc();
    }

    pub fn generated(&self) -> u64 {
        self.generated_total.get() as u64
    }

    pub fn failed(&self) -> u64 {
        self.failed_total.get() as u64
    }

    pub fn get_prometheus_metrics(&self) -> Result<String, BlogError> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();

        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(internal)?;

        String::from_utf8(buffer).map_err(internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_models::{GeneratedBlog, TokenUsage};

    fn blog() -> GeneratedBlog {
        GeneratedBlog {
            topic: "Edge AI".to_string(),
            content: "body".to_string(),
            word_count: 1,
            model_used: "gpt-4o".to_string(),
            usage: TokenUsage::new(100, 200),
            cost: 0.0035,
            seo_keywords_used: vec![],
            llm_keywords_used: vec![],
            links_used: vec![],
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn outcomes_update_counters() {
        let metrics = MetricsService::new().unwrap();
        metrics.record_outcome(&BlogOutcome::Success(blog()), Duration::from_secs(3));
        metrics.record_outcome(
            &BlogOutcome::Failed {
                topic: "AI Search".to_string(),
                error: "boom".to_string(),
            },
            Duration::from_millis(200),
        );
        metrics.record_publish_failure("airtable");

        assert_eq!(metrics.generated(), 1);
        assert_eq!(metrics.failed(), 1);

        let text = metrics.get_prometheus_metrics().unwrap();
        assert!(text.contains("blog_generated_total 1"));
        assert!(text.contains("blog_failed_total 1"));
        assert!(text.contains(r#"blog_tokens_total{kind="output"} 200"#));
        assert!(text.contains(r#"blog_publish_failures_total{sink="airtable"} 1"#));
        assert!(text.contains("blog_generation_duration_seconds_count 2"));
    }
}
