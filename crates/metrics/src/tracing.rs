use blog_models::{BlogError, GeneratedBlog, LogFormat, LoggingConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub struct TracingService;

impl TracingService {
    /// Installs the global subscriber. `RUST_LOG` overrides the configured level.
    pub fn init(config: &LoggingConfig) -> Result<(), BlogError> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .map_err(|e| BlogError::Config {
                reason: format!("invalid log level '{}': {e}", config.level),
            })?;

        let installed = match config.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .try_init(),
        };
        installed.map_err(|e| BlogError::Internal {
            reason: e.to_string(),
        })
    }

    pub fn log_blog_generated(blog: &GeneratedBlog, duration_ms: u64) {
        info!(
            topic = %blog.topic,
            model = %blog.model_used,
            word_count = blog.word_count,
            input_tokens = blog.usage.input_tokens,
            output_tokens = blog.usage.output_tokens,
            cost = blog.cost,
            duration_ms = duration_ms,
            "Blog generated"
        );
    }

    pub fn log_blog_failed(topic: &str, error_message: &str, duration_ms: u64) {
        error!(
            topic = %topic,
            error_message = %error_message,
            duration_ms = duration_ms,
            "Blog generation failed"
        );
    }

    pub fn log_published(sink: &str, topic: &str, reference: &str) {
        info!(
            sink = %sink,
            topic = %topic,
            reference = %reference,
            "Blog published"
        );
    }

    pub fn log_publish_failed(sink: &str, topic: &str, error: &BlogError) {
        warn!(
            sink = %sink,
            topic = %topic,
            error_type = %error.error_type(),
            error_message = %error,
            "Publish failed"
        );
    }

    pub fn log_batch_completed(requested: usize, successful: usize, total_cost: f64) {
        info!(
            requested = requested,
            successful = successful,
            failed = requested.saturating_sub(successful),
            total_cost = total_cost,
            "Batch completed"
        );
    }
}
