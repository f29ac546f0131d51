use anyhow::{bail, Result};
use blog_archive::BlogArchive;
use blog_models::{with_thousands, BlogOutcome, Insights};
use blog_publish::Publisher;
use blog_writer::BlogGenerator;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// What one `generate` run produced.
#[derive(Debug)]
pub struct GenerationRun {
    pub requested: usize,
    pub outcomes: Vec<BlogOutcome>,
    pub saved: Vec<PathBuf>,
    pub summary: PathBuf,
    pub published: BTreeMap<&'static str, usize>,
}

impl GenerationRun {
    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn total_cost(&self) -> f64 {
        self.outcomes.iter().map(BlogOutcome::cost).sum()
    }
}

/// Checks the OpenAI connection, then writes up to `requested` blogs in topic order.
///
/// Archived files are numbered by topic position, so a failed topic leaves a
/// gap. The summary counts every requested blog that was not written as
/// failed. Successful blogs go to `publisher` when one is given.
pub async fn run_generation(
    generator: &BlogGenerator,
    insights: &Insights,
    archive: &BlogArchive,
    requested: usize,
    publisher: Option<&Publisher>,
) -> Result<GenerationRun> {
    println!("🔍 Testing OpenAI connection...");
    if !generator.test_connection().await {
        bail!("OpenAI connection failed. Check your API key.");
    }
    println!("\n🤖 Generating {requested} blogs...");

    archive.ensure_dir()?;

    let mut outcomes = Vec::new();
    let mut saved = Vec::new();
    for (i, topic) in insights.topics.iter().take(requested).enumerate() {
        println!("\n📝 Blog {}/{}: {}", i + 1, requested, topic.topic);
        let outcome = generator.generate(topic, insights).await;
        match &outcome {
            BlogOutcome::Success(blog) => {
                let path = archive.write_blog(i + 1, blog)?;
                println!("✅ Blog generated! ({} words)", blog.word_count);
                println!(
                    "💰 Tokens: {} | Cost: ${:.4}",
                    with_thousands(blog.usage.total_tokens),
                    blog.cost
                );
                println!("💾 Saved to: {}", path.display());
                saved.push(path);
            }
            BlogOutcome::Failed { error, .. } => println!("❌ Failed: {error}"),
        }
        outcomes.push(outcome);
    }

    let summary = archive.write_summary(requested, &outcomes)?;

    let published = match publisher {
        Some(publisher) => publisher.publish_many(&outcomes).await,
        None => BTreeMap::new(),
    };

    let run = GenerationRun {
        requested,
        outcomes,
        saved,
        summary,
        published,
    };
    info!(
        requested,
        successful = run.successful(),
        total_cost = run.total_cost(),
        "Generation run finished"
    );
    Ok(run)
}
