use anyhow::{Context, Result};
use blog_api::{start_server, AppState};
use blog_metrics::{MetricsService, TracingService};
use blog_models::{Config, DEFAULT_CONFIG_PATH};
use blog_publish::Publisher;
use blog_workbook::WorkbookReader;
use blog_writer::BlogGenerator;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "blog-generator-server")]
#[command(about = "HTTP API for workbook-driven blog generation")]
struct Args {
    /// TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = Config::load(Some(&args.config)).context("Failed to load configuration")?;
    TracingService::init(&config.logging)?;

    info!("Starting Blog Generator API");
    info!("Configuration loaded: {:?}", config);

    let insights = match WorkbookReader::new(&config.data.workbook_path).read() {
        Ok(insights) => insights,
        Err(e) => {
            error!(path = %config.data.workbook_path, "Failed to initialize components: {}", e);
            return Err(e.into());
        }
    };
    info!(
        topics = insights.topics.len(),
        seo_categories = insights.seo_keywords.category_count(),
        llm_categories = insights.llm_keywords.category_count(),
        website_links = insights.website_links.len(),
        "Workbook loaded"
    );

    if !config.openai.has_api_key() {
        warn!("OPENAI_API_KEY is not set, generation requests will fail");
    }

    let generator = Arc::new(BlogGenerator::new(
        config.openai.clone(),
        config.pricing.clone(),
    )?);
    let publisher = Arc::new(Publisher::from_config(&config));
    let metrics = Arc::new(MetricsService::new()?);

    let state = AppState::new(
        config,
        Arc::new(insights),
        generator,
        publisher,
        metrics,
    );

    start_server(state, shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("Blog Generator API stopped");
    Ok(())
}
