pub mod openai;
pub mod prompt;

pub use openai::*;
pub use prompt::*;

use blog_models::{
    BlogError, BlogOutcome, GeneratedBlog, Insights, OpenAiConfig, PricingConfig, TokenUsage,
    Topic, WebsiteLink, PROMPT_KEYWORD_LIMIT,
};
use tracing::{error, info, instrument};

/// USD cost of a completion at the configured per-1K rates.
pub fn cost_for(usage: &TokenUsage, pricing: &PricingConfig) -> f64 {
    usage.input_tokens as f64 / 1000.0 * pricing.input_per_1k
        + usage.output_tokens as f64 / 1000.0 * pricing.output_per_1k
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

pub struct BlogGenerator {
    client: OpenAiClient,
    pricing: PricingConfig,
}

impl BlogGenerator {
    pub fn new(openai: OpenAiConfig, pricing: PricingConfig) -> Result<Self, BlogError> {
        Ok(Self {
            client: OpenAiClient::new(openai)?,
            pricing,
        })
    }

    pub async fn test_connection(&self) -> bool {
        self.client.test_connection().await
    }

    /// Writes one post. Errors are folded into `BlogOutcome::Failed`.
    pub async fn generate(&self, topic: &Topic, insights: &Insights) -> BlogOutcome {
        let links = {
            let mut rng = rand::thread_rng();
            select_links(&insights.website_links, LINK_SAMPLE_SIZE, &mut rng)
        };
        self.generate_with_links(topic, insights, links).await
    }

    #[instrument(skip(self, insights, links), fields(topic = %topic.topic))]
    pub async fn generate_with_links(
        &self,
        topic: &Topic,
        insights: &Insights,
        links: Vec<WebsiteLink>,
    ) -> BlogOutcome {
        info!("Generating blog");
        match self.write(topic, insights, &links).await {
            Ok(blog) => {
                info!(
                    word_count = blog.word_count,
                    total_tokens = blog.usage.total_tokens,
                    cost = blog.cost,
                    "Blog generated"
                );
                BlogOutcome::Success(blog)
            }
            Err(e) => {
                error!(error = %e, "Error generating blog");
                BlogOutcome::Failed {
                    topic: topic.topic.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn write(
        &self,
        topic: &Topic,
        insights: &Insights,
        links: &[WebsiteLink],
    ) -> Result<GeneratedBlog, BlogError> {
        let prompt = build_prompt(topic, &insights.seo_keywords, &insights.llm_keywords, links);
        let config = self.client.config();
        let request = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
        };

        let completion = self.client.chat(&request).await?;

        Ok(GeneratedBlog {
            topic: topic.topic.clone(),
            word_count: word_count(&completion.content),
            cost: cost_for(&completion.usage, &self.pricing),
            content: completion.content,
            model_used: completion.model,
            usage: completion.usage,
            seo_keywords_used: insights.seo_keywords.first_column(PROMPT_KEYWORD_LIMIT),
            llm_keywords_used: insights.llm_keywords.first_column(PROMPT_KEYWORD_LIMIT),
            links_used: links.iter().map(|l| l.name.clone()).collect(),
            generated_at: chrono::Utc::now(),
        })
    }
}
