use anyhow::Result;
use blog_models::{
    GenerateBlogRequest, GenerateMultipleRequest, HealthResponse, KeywordsResponse,
    StatsResponse, TopicsResponse,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct BlogApiClient {
    client: Client,
    base_url: String,
}

impl BlogApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            anyhow::bail!("GET {} failed: {}", path, error_text);
        }

        Ok(response.json().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.get_json("/api/health").await
    }

    pub async fn topics(&self) -> Result<TopicsResponse> {
        self.get_json("/api/topics").await
    }

    pub async fn keywords(&self) -> Result<KeywordsResponse> {
        self.get_json("/api/keywords").await
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        self.get_json("/api/stats").await
    }

    pub async fn metrics(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/metrics", self.base_url))
            .send()
            .await?;
        Ok(response.text().await?)
    }

    /// Status and raw body, so callers can assert on error responses too.
    pub async fn generate_blog(&self, request: &GenerateBlogRequest) -> Result<(StatusCode, Value)> {
        let response = self
            .client
            .post(format!("{}/api/generate-blog", self.base_url))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        Ok((status, response.json().await?))
    }

    pub async fn generate_multiple(
        &self,
        request: &GenerateMultipleRequest,
    ) -> Result<(StatusCode, Value)> {
        let response = self
            .client
            .post(format!("{}/api/generate-multiple", self.base_url))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        Ok((status, response.json().await?))
    }
}
