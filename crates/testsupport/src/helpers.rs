use anyhow::Result;
use blog_models::Config;
use std::path::Path;
use std::time::Duration;

/// Poll until a condition is met or timeout
pub async fn poll_until<F, Fut>(
    description: &str,
    timeout_duration: Duration,
    mut condition: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<bool>>,
{
    let start = std::time::Instant::now();
    let poll_interval = Duration::from_millis(50);

    loop {
        if start.elapsed() >= timeout_duration {
            anyhow::bail!("Timeout waiting for: {}", description);
        }

        if condition().await? {
            return Ok(());
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Config pointed at a mock upstream and a scratch directory.
pub fn test_config(upstream: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.server.bind = "127.0.0.1".to_string();
    config.server.port = 0;
    config.openai.api_key = Some("sk-test".to_string());
    config.openai.base_url = format!("{upstream}/v1");
    config.openai.request_timeout_secs = 5;
    config.airtable.base_url = format!("{upstream}/airtable");
    config.sheets.base_url = format!("{upstream}/sheets");
    config.sheets.token_url = format!("{upstream}/token");
    config.data.output_dir = dir.join("generated_blogs").display().to_string();
    config.data.workbook_path = dir.join("Key Insights.xlsx").display().to_string();
    config.data.report_path = dir.join("MANAGER_REPORT.txt").display().to_string();
    config
}
