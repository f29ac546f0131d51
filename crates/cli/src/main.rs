mod pipeline;

use anyhow::{bail, Context, Result};
use blog_archive::{check_costs, BlogArchive, ManagerReport};
use blog_metrics::TracingService;
use blog_models::{with_thousands, Config, Insights, DEFAULT_CONFIG_PATH};
use blog_publish::{Publisher, SheetsSink};
use blog_workbook::WorkbookReader;
use blog_writer::BlogGenerator;
use clap::{Parser, Subcommand};
use pipeline::run_generation;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-cli")]
#[command(about = "Generate, archive and report on SEO blog posts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate blogs from the workbook topics
    Generate {
        /// Number of blogs to generate
        #[arg(long, conflicts_with = "all")]
        count: Option<usize>,
        /// Generate one blog per topic
        #[arg(long)]
        all: bool,
        /// Write successful blogs to the configured sinks
        #[arg(long)]
        publish: bool,
    },
    /// Summarise token usage and cost of archived blogs
    Report,
    /// Check whether archived blogs carry token and cost data
    CheckCosts,
    /// Check OpenAI, Airtable and Google Sheets connections
    Check,
    /// List workbook topics
    Topics,
    /// Write the header row to the configured Google Sheet
    SheetsSetup,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(Some(&cli.config))?;
    TracingService::init(&config.logging)?;

    match cli.command {
        Commands::Generate {
            count,
            all,
            publish,
        } => generate(&config, count, all, publish).await,
        Commands::Report => report(&config),
        Commands::CheckCosts => check_archive_costs(&config),
        Commands::Check => check(&config).await,
        Commands::Topics => topics(&config),
        Commands::SheetsSetup => sheets_setup(&config).await,
    }
}

fn load_insights(config: &Config) -> Result<Insights> {
    println!("📊 Loading Excel data...");
    WorkbookReader::new(&config.data.workbook_path)
        .read()
        .with_context(|| format!("Failed to load {}", config.data.workbook_path))
}

/// Maps an interactive menu choice to a blog count. The flag is set when the
/// input was not a menu option.
fn menu_count(choice: &str, available: usize) -> (usize, bool) {
    match choice.trim() {
        "1" => (1, false),
        "2" => (3, false),
        "3" => (5, false),
        "4" => (available, false),
        _ => (1, true),
    }
}

fn prompt_count(available: usize) -> Result<usize> {
    println!("\nHow many blogs would you like to generate?");
    println!("1. Generate 1 test blog");
    println!("2. Generate 3 blogs");
    println!("3. Generate 5 blogs");
    println!("4. Generate all blogs");
    print!("Enter choice (1-4): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let (count, invalid) = menu_count(&line, available);
    if invalid {
        println!("Invalid choice, generating 1 test blog");
    }
    Ok(count)
}

async fn generate(config: &Config, count: Option<usize>, all: bool, publish: bool) -> Result<()> {
    println!("🚀 Blog Generation Pipeline");
    println!("{}", "=".repeat(60));

    let insights = load_insights(config)?;
    let generator = BlogGenerator::new(config.openai.clone(), config.pricing.clone())?;
    println!(
        "✅ Ready to generate blogs from {} topics",
        insights.topics.len()
    );

    let requested = match (count, all) {
        (_, true) => insights.topics.len(),
        (Some(n), false) => n,
        (None, false) => prompt_count(insights.topics.len())?,
    };

    let publisher = publish
        .then(|| Publisher::from_config(config))
        .filter(|p| {
            if p.is_empty() {
                println!("⚠️  No publishing sinks configured, skipping publish");
            }
            !p.is_empty()
        });

    let archive = BlogArchive::new(&config.data.output_dir);
    let run = run_generation(
        &generator,
        &insights,
        &archive,
        requested,
        publisher.as_ref(),
    )
    .await?;

    let successful = run.successful();
    println!("\n🎉 Generation complete!");
    println!("✅ Successfully generated: {successful}/{requested} blogs");
    println!("💰 Total cost: ${:.4}", run.total_cost());
    println!("📊 Summary saved to: {}", run.summary.display());
    for (sink, written) in &run.published {
        println!("📤 {sink}: {written}/{successful} blogs written");
    }
    Ok(())
}

fn report(config: &Config) -> Result<()> {
    let archive = BlogArchive::new(&config.data.output_dir);
    if !archive.exists() {
        bail!("Please generate blogs first using: blog-cli generate");
    }
    let blogs = archive.scan()?;
    if blogs.is_empty() {
        bail!("No blog files found in {}", config.data.output_dir);
    }

    let report = ManagerReport::from_blogs(blogs, &config.pricing);
    println!("📊 MANAGER REPORT - TOKEN USAGE AND COSTS");
    println!("{}", "=".repeat(60));
    println!("📅 Report Date: {}", report.generated_at);
    println!("🤖 Model Used: {}", report.model);
    println!("📝 Total Blogs Generated: {}", report.blog_count());
    println!("📊 Total Input Tokens: {}", with_thousands(report.total_input_tokens));
    println!("📊 Total Output Tokens: {}", with_thousands(report.total_output_tokens));
    println!("📊 Total Tokens Used: {}", with_thousands(report.total_tokens()));
    println!("💰 Total Cost: ${:.4}", report.total_cost);
    println!("💰 Average Cost per Blog: ${:.4}", report.average_cost());
    println!("💰 Cost per 1,000 tokens: ${:.4}", report.cost_per_1k_tokens());

    println!("\n📋 INDIVIDUAL BLOG BREAKDOWN:");
    print!("{}", report.console_table());

    std::fs::write(&config.data.report_path, report.render())
        .with_context(|| format!("Failed to write {}", config.data.report_path))?;
    println!("\n💾 Detailed report saved to: {}", config.data.report_path);

    println!("\n🎯 KEY INSIGHTS:");
    println!("   • Each blog costs approximately ${:.4}", report.average_cost());
    println!("   • Total project cost: ${:.4}", report.total_cost);
    println!(
        "   • Token efficiency: {:.0} tokens per blog on average",
        report.average_tokens()
    );
    Ok(())
}

fn check_archive_costs(config: &Config) -> Result<()> {
    let dir = PathBuf::from(&config.data.output_dir);
    if !dir.is_dir() {
        println!("❌ No {} folder found", config.data.output_dir);
        return Ok(());
    }

    let check = check_costs(&dir)?;
    println!("📁 Found {} blog files", check.files);
    let Some(first) = &check.first_file else {
        return Ok(());
    };

    println!("\n📄 Checking: {first}");
    println!("📊 First {} lines of blog file:", check.preview.len());
    println!("{}", "-".repeat(40));
    for (i, line) in check.preview.iter().enumerate() {
        println!("{:2}: {}", i + 1, line);
    }

    let mark = |ok: bool| if ok { "✅" } else { "❌" };
    println!("\n🔍 Analysis:");
    println!("Has token information: {}", mark(check.has_tokens));
    println!("Has cost information: {}", mark(check.has_cost));
    if check.is_tracked() {
        println!("\n✅ Your blogs already have token/cost tracking!");
    } else {
        println!("\n💡 These blogs predate token/cost tracking; regenerate them to include it.");
    }
    Ok(())
}

async fn check(config: &Config) -> Result<()> {
    let generator = BlogGenerator::new(config.openai.clone(), config.pricing.clone())?;
    let openai = generator.test_connection().await;
    println!(
        "{} OpenAI ({})",
        if openai { "✅" } else { "❌" },
        config.openai.model
    );

    let publisher = Publisher::from_config(config);
    for name in ["airtable", "sheets"] {
        match publisher.sink(name) {
            Some(sink) => {
                let ok = sink.test_connection().await;
                println!("{} {name}", if ok { "✅" } else { "❌" });
            }
            None => println!("⚪ {name} not configured"),
        }
    }
    Ok(())
}

fn topics(config: &Config) -> Result<()> {
    let insights = load_insights(config)?;
    println!("📋 Topics ({}):", insights.topics.len());
    for (id, topic) in insights.topics.iter().enumerate() {
        println!("   {id:>3}. {}", topic.topic);
        if !topic.description.is_empty() {
            println!("        {}", topic.description);
        }
    }
    Ok(())
}

async fn sheets_setup(config: &Config) -> Result<()> {
    let sink = SheetsSink::new(&config.sheets)?;
    sink.setup_headers().await?;
    println!("✅ Sheet headers created successfully!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn menu_choices_map_to_counts() {
        assert_eq!(menu_count("1\n", 12), (1, false));
        assert_eq!(menu_count(" 2 ", 12), (3, false));
        assert_eq!(menu_count("3", 12), (5, false));
        assert_eq!(menu_count("4", 12), (12, false));
        assert_eq!(menu_count("seven", 12), (1, true));
    }

    #[test]
    fn count_and_all_conflict() {
        assert!(Cli::try_parse_from(["blog-cli", "generate", "--count", "2", "--all"]).is_err());
        let cli = Cli::try_parse_from(["blog-cli", "generate", "--count", "2", "--publish"]).unwrap();
        match cli.command {
            Commands::Generate {
                count,
                all,
                publish,
            } => {
                assert_eq!(count, Some(2));
                assert!(!all);
                assert!(publish);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["blog-cli", "report", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
    }
}
