use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use blog_metrics::TracingService;
use blog_models::{
    BatchItem, BatchSummary, BlogError, BlogOutcome, BlogPayload, ErrorShape,
    GenerateBlogRequest, GenerateBlogResponse, GenerateMultipleRequest, GenerateMultipleResponse,
    GenerationFailedResponse, HealthResponse, KeywordsResponse, StatsResponse, Topic,
    TopicSummary, TopicsResponse,
};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

type ApiError = (StatusCode, Json<ErrorShape>);

fn api_error(e: &BlogError) -> ApiError {
    (
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(e.to_error_shape()),
    )
}

fn no_data_error() -> ApiError {
    api_error(&BlogError::InvalidRequest {
        reason: "No data provided".to_string(),
    })
}

fn no_data(rejection: JsonRejection) -> ApiError {
    warn!("Rejected request body: {}", rejection);
    no_data_error()
}

fn no_topic() -> ApiError {
    warn!("Blog request names neither a topic id nor a custom topic");
    no_data_error()
}

#[instrument(skip(_state))]
pub async fn health_check(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        message: "Blog Generator API is running".to_string(),
    })
}

#[instrument(skip(state))]
pub async fn list_topics(State(state): State<AppState>) -> Json<TopicsResponse> {
    let topics: Vec<TopicSummary> = state
        .insights
        .topics
        .iter()
        .enumerate()
        .map(|(id, topic)| TopicSummary::from_topic(id, topic))
        .collect();
    Json(TopicsResponse {
        count: topics.len(),
        topics,
    })
}

#[instrument(skip(state))]
pub async fn list_keywords(State(state): State<AppState>) -> Json<KeywordsResponse> {
    Json(KeywordsResponse {
        seo_keywords: (&state.insights.seo_keywords).into(),
        llm_keywords: (&state.insights.llm_keywords).into(),
    })
}

/// Generates one post, records it and writes it to every sink.
async fn generate_and_publish(state: &AppState, topic: &Topic) -> BlogOutcome {
    let started = Instant::now();
    let outcome = state.generator.generate(topic, &state.insights).await;
    let elapsed = started.elapsed();
    state.metrics.record_outcome(&outcome, elapsed);

    match &outcome {
        BlogOutcome::Success(blog) => {
            TracingService::log_blog_generated(blog, elapsed.as_millis() as u64);
            for write in state.publisher.publish_all(blog).await {
                match &write.result {
                    Ok(reference) => TracingService::log_published(write.sink, &blog.topic, reference),
                    Err(e) => {
                        state.metrics.record_publish_failure(write.sink);
                        TracingService::log_publish_failed(write.sink, &blog.topic, e);
                    }
                }
            }
        }
        BlogOutcome::Failed { topic, error } => {
            TracingService::log_blog_failed(topic, error, elapsed.as_millis() as u64);
        }
    }
    outcome
}

#[instrument(skip(state, payload))]
pub async fn generate_blog(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBlogRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(no_data)?;
    if request.topic_id.is_none() && request.custom_topic.is_none() {
        return Err(no_topic());
    }

    let topic = match request
        .custom_topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        Some(custom) => Topic::custom(custom),
        None => request
            .topic_id
            .and_then(|id| state.insights.topic(id))
            .cloned()
            .ok_or_else(|| api_error(&BlogError::InvalidTopic))?,
    };
    info!(topic = %topic.topic, "Blog requested");

    if !state.generator.test_connection().await {
        error!("OpenAI connection check failed");
        return Err(api_error(&BlogError::OpenAiConnection));
    }

    match generate_and_publish(&state, &topic).await {
        BlogOutcome::Success(blog) => Ok(Json(GenerateBlogResponse {
            status: "success".to_string(),
            blog: BlogPayload::from(&blog),
        })
        .into_response()),
        BlogOutcome::Failed { error, .. } => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GenerationFailedResponse {
                status: "error".to_string(),
                error,
            }),
        )
            .into_response()),
    }
}

/// Topics for a batch: the requested ids (capped at `count`) or the first `count` topics.
fn batch_topics(
    request: &GenerateMultipleRequest,
    topics: &[Topic],
) -> Result<Vec<Topic>, BlogError> {
    if request.topic_ids.is_empty() {
        return Ok(topics.iter().take(request.count).cloned().collect());
    }
    request
        .topic_ids
        .iter()
        .take(request.count)
        .map(|&id| topics.get(id).cloned().ok_or(BlogError::InvalidTopic))
        .collect()
}

#[instrument(skip(state, payload))]
pub async fn generate_multiple(
    State(state): State<AppState>,
    payload: Result<Json<GenerateMultipleRequest>, JsonRejection>,
) -> Result<Json<GenerateMultipleResponse>, ApiError> {
    let Json(request) = payload.map_err(no_data)?;

    let max = state.config.server.max_batch_size;
    if request.count > max {
        return Err(api_error(&BlogError::BatchTooLarge { max }));
    }
    let topics = batch_topics(&request, &state.insights.topics).map_err(|e| api_error(&e))?;
    info!(count = request.count, topics = topics.len(), "Batch requested");

    let mut outcomes = Vec::with_capacity(topics.len());
    for topic in &topics {
        outcomes.push(generate_and_publish(&state, topic).await);
    }

    let summary = BatchSummary::from_outcomes(request.count, &outcomes);
    TracingService::log_batch_completed(outcomes.len(), summary.successful, summary.total_cost);
    let results = outcomes
        .iter()
        .enumerate()
        .map(|(i, outcome)| BatchItem::from_outcome(i + 1, outcome))
        .collect();

    Ok(Json(GenerateMultipleResponse {
        status: "completed".to_string(),
        summary,
        results,
    }))
}

#[instrument(skip(state))]
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let openai_connected = state.generator.test_connection().await;
    let airtable_connected = match state.publisher.sink("airtable") {
        Some(sink) => sink.test_connection().await,
        None => false,
    };
    Json(StatsResponse {
        available_topics: state.insights.topics.len(),
        seo_categories: state.insights.seo_keywords.category_count(),
        llm_categories: state.insights.llm_keywords.category_count(),
        website_links: state.insights.website_links.len(),
        openai_connected,
        airtable_connected,
    })
}

#[instrument(skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    match state.metrics.get_prometheus_metrics() {
        Ok(metrics) => Ok(metrics),
        Err(e) => {
            error!("Failed to get metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
