use anyhow::Result;
use blog_api::{serve, AppState};
use blog_metrics::MetricsService;
use blog_models::Config;
use blog_publish::Publisher;
use blog_testsupport::{poll_until, write_sample_workbook, BlogApiClient};
use blog_workbook::WorkbookReader;
use blog_writer::BlogGenerator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// API server running in-process on an ephemeral port.
pub struct TestServer {
    pub client: BlogApiClient,
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), &mut self.handle).await??;
        Ok(())
    }
}

/// Writes the sample workbook to `config.data.workbook_path`'s directory,
/// wires the services the way the server binary does and starts serving.
pub async fn spawn_server(config: Config) -> Result<TestServer> {
    let workbook_dir = std::path::Path::new(&config.data.workbook_path)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    let workbook = write_sample_workbook(&workbook_dir)?;
    let insights = WorkbookReader::new(workbook).read()?;

    let generator = BlogGenerator::new(config.openai.clone(), config.pricing.clone())?;
    let publisher = Publisher::from_config(&config);
    let state = AppState::new(
        config,
        Arc::new(insights),
        Arc::new(generator),
        Arc::new(publisher),
        Arc::new(MetricsService::new()?),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let _ = serve(listener, state, async {
            let _ = rx.await;
        })
        .await;
    });

    let client = BlogApiClient::new(base_url.clone());
    let health = &client;
    poll_until("api health", Duration::from_secs(5), move || async move {
        Ok::<_, anyhow::Error>(health.health().await.is_ok())
    })
    .await?;

    Ok(TestServer {
        client,
        base_url,
        shutdown: Some(tx),
        handle,
    })
}
