use blog_metrics::MetricsService;
use blog_models::{Config, Insights};
use blog_publish::Publisher;
use blog_writer::BlogGenerator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub insights: Arc<Insights>,
    pub generator: Arc<BlogGenerator>,
    pub publisher: Arc<Publisher>,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    pub fn new(
        config: Config,
        insights: Arc<Insights>,
        generator: Arc<BlogGenerator>,
        publisher: Arc<Publisher>,
        metrics: Arc<MetricsService>,
    ) -> Self {
        Self {
            config,
            insights,
            generator,
            publisher,
            metrics,
        }
    }
}
