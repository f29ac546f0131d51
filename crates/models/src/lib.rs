pub mod api;
pub mod blog;
pub mod config;
pub mod error;
pub mod insights;

pub use api::*;
pub use blog::*;
pub use config::*;
pub use error::*;
pub use insights::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blog(cost: f64) -> GeneratedBlog {
        GeneratedBlog {
            topic: "Edge AI".to_string(),
            content: "META_TITLE: Edge AI\n\n# Edge AI".to_string(),
            word_count: 6,
            model_used: "gpt-4o".to_string(),
            usage: TokenUsage::new(1200, 2400),
            cost,
            seo_keywords_used: vec!["edge computing".to_string()],
            llm_keywords_used: vec!["on-device inference".to_string()],
            links_used: vec!["Home".to_string()],
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_generate_blog_request_defaults() {
        let request: GenerateBlogRequest = serde_json::from_str(r#"{"topic_id": 2}"#).unwrap();
        assert_eq!(request.topic_id, Some(2));
        assert!(request.custom_topic.is_none());
        assert!(request.selected_keywords.is_none());
    }

    #[test]
    fn test_generate_blog_request_ignores_keyword_shape() {
        let request: GenerateBlogRequest = serde_json::from_str(
            r#"{"topic_id": 1, "selected_keywords": {"seo": ["a"], "llm": []}}"#,
        )
        .unwrap();
        assert_eq!(request.topic_id, Some(1));
        assert!(request.selected_keywords.is_some());

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("selected_keywords").is_none());
    }

    #[test]
    fn test_generate_multiple_request_default_count() {
        let request: GenerateMultipleRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.count, 3);
        assert!(request.topic_ids.is_empty());
    }

    #[test]
    fn test_blog_payload_flattens_usage() {
        let blog = sample_blog(0.042);
        let payload = BlogPayload::from(&blog);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["input_tokens"], 1200);
        assert_eq!(json["output_tokens"], 2400);
        assert_eq!(json["total_tokens"], 3600);
        assert_eq!(json["model_used"], "gpt-4o");
    }

    #[test]
    fn test_batch_summary_counts_and_averages() {
        let outcomes = vec![
            BlogOutcome::Success(sample_blog(0.04)),
            BlogOutcome::Failed {
                topic: "Broken".to_string(),
                error: "timeout".to_string(),
            },
            BlogOutcome::Success(sample_blog(0.02)),
        ];
        let summary = BatchSummary::from_outcomes(5, &outcomes);
        assert_eq!(summary.total_requested, 5);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.total_cost, 0.06);
        assert_eq!(summary.average_cost, 0.03);
    }

    #[test]
    fn test_batch_summary_with_no_successes() {
        let outcomes = vec![BlogOutcome::Failed {
            topic: "Broken".to_string(),
            error: "timeout".to_string(),
        }];
        let summary = BatchSummary::from_outcomes(1, &outcomes);
        assert_eq!(summary.average_cost, 0.0);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_batch_summary_counts_missing_topics_as_failed() {
        let outcomes = vec![
            BlogOutcome::Success(sample_blog(0.01)),
            BlogOutcome::Success(sample_blog(0.01)),
        ];
        let summary = BatchSummary::from_outcomes(5, &outcomes);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 3);
    }

    #[test]
    fn test_batch_item_from_failure() {
        let outcome = BlogOutcome::Failed {
            topic: "Broken".to_string(),
            error: "rate limited".to_string(),
        };
        let item = BatchItem::from_outcome(1, &outcome);
        assert_eq!(item.status, "failed");
        assert_eq!(item.tokens, 0);
        assert_eq!(item.error, "rate limited");
    }

    #[test]
    fn test_error_shape_and_status() {
        let err = BlogError::BatchTooLarge { max: 10 };
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.to_error_shape().error, "Maximum 10 blogs per request");

        let err = BlogError::OpenAiConnection;
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.to_error_shape().error, "OpenAI connection failed");

        assert_eq!(BlogError::InvalidTopic.to_string(), "Invalid topic selection");
    }

    #[test]
    fn test_keyword_table_first_column() {
        let table = KeywordTable::new(vec![
            KeywordColumn {
                name: "Primary".to_string(),
                values: (1..=7).map(|i| format!("kw{i}")).collect(),
            },
            KeywordColumn {
                name: "Secondary".to_string(),
                values: vec!["other".to_string()],
            },
        ]);
        assert_eq!(
            table.first_column(PROMPT_KEYWORD_LIMIT),
            vec!["kw1", "kw2", "kw3", "kw4", "kw5"]
        );
        assert!(KeywordTable::default().first_column(5).is_empty());
    }

    #[test]
    fn test_keyword_columns_keep_sheet_order() {
        let columns = KeywordColumns(vec![
            KeywordColumn {
                name: "Zeta".to_string(),
                values: vec!["z1".to_string()],
            },
            KeywordColumn {
                name: "Alpha".to_string(),
                values: vec!["a1".to_string(), "a2".to_string()],
            },
        ]);
        let json = serde_json::to_string(&columns).unwrap();
        assert_eq!(json, r#"{"Zeta":["z1"],"Alpha":["a1","a2"]}"#);

        let back: KeywordColumns = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names(), vec!["Zeta", "Alpha"]);
        assert_eq!(back.get("Alpha").unwrap().len(), 2);
    }
}
