mod common;

use blog_models::{GenerateBlogRequest, GenerateMultipleRequest};
use blog_testsupport::{completion_body, test_config, write_service_account, SAMPLE_CONTENT};
use common::spawn_server;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_upstreams(upstream: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            SAMPLE_CONTENT,
            1500,
            2500,
        )))
        .mount(upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/airtable/appBase/Table%201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"id": "recA"}]
        })))
        .mount(upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test",
            "expires_in": 3600
        })))
        .mount(upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/sheets/spreadsheets/sheet-1/values/A2:append"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updates": {"updatedRange": "Sheet1!A2:K2"}
        })))
        .mount(upstream)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn generated_blog_reaches_every_sink() -> anyhow::Result<()> {
    let upstream = MockServer::start().await;
    mount_upstreams(&upstream).await;

    let dir = tempfile::tempdir()?;
    let mut config = test_config(&upstream.uri(), dir.path());
    config.airtable.api_key = Some("pat-test".to_string());
    config.airtable.base_id = Some("appBase".to_string());
    config.sheets.sheet_id = Some("sheet-1".to_string());
    config.sheets.credentials_file = write_service_account(dir.path())?.display().to_string();
    let server = spawn_server(config).await?;

    let (status, body) = server
        .client
        .generate_blog(&GenerateBlogRequest {
            topic_id: Some(0),
            ..Default::default()
        })
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blog"]["topic"], "Edge AI");
    assert_eq!(body["blog"]["input_tokens"], 1500);
    // 1.5K * 0.005 + 2.5K * 0.015
    assert!((body["blog"]["cost"].as_f64().unwrap() - 0.045).abs() < 1e-9);

    let requests = upstream.received_requests().await.unwrap();
    let hits = |p: &str| requests.iter().filter(|r| r.url.path() == p).count();
    assert_eq!(hits("/v1/chat/completions"), 2, "connection check plus generation");
    assert_eq!(hits("/airtable/appBase/Table%201"), 1);
    assert_eq!(hits("/sheets/spreadsheets/sheet-1/values/A2:append"), 1);

    let metrics = server.client.metrics().await?;
    assert!(metrics.contains("blog_generated_total 1"));

    server.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_sink_does_not_fail_the_request() -> anyhow::Result<()> {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            SAMPLE_CONTENT,
            100,
            100,
        )))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/airtable/appBase/Table%201"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let dir = tempfile::tempdir()?;
    let mut config = test_config(&upstream.uri(), dir.path());
    config.airtable.api_key = Some("pat-test".to_string());
    config.airtable.base_id = Some("appBase".to_string());
    let server = spawn_server(config).await?;

    let (status, body) = server
        .client
        .generate_multiple(&GenerateMultipleRequest {
            count: 2,
            topic_ids: vec![1, 0],
        })
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["successful"], 2);
    assert_eq!(body["results"][0]["topic"], "AI Search");
    assert_eq!(body["results"][1]["topic"], "Edge AI");

    let metrics = server.client.metrics().await?;
    assert!(metrics.contains(r#"blog_publish_failures_total{sink="airtable"} 2"#));

    server.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn batch_limit_comes_from_config() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = test_config("http://127.0.0.1:9", dir.path());
    config.server.max_batch_size = 2;
    let server = spawn_server(config).await?;

    let (status, body) = server
        .client
        .generate_multiple(&GenerateMultipleRequest {
            count: 3,
            topic_ids: vec![],
        })
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Maximum 2 blogs per request");

    server.stop().await?;
    Ok(())
}
