use crate::ArchivedBlog;
use blog_models::{with_thousands, PricingConfig};
use std::fmt;

const CONSOLE_TOPIC_LEN: usize = 34;

/// Token and cost totals over the archived blogs.
#[derive(Debug, Clone)]
pub struct ManagerReport {
    pub generated_at: String,
    pub model: String,
    pub blogs: Vec<ArchivedBlog>,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cost: f64,
    pub pricing: PricingConfig,
}

impl ManagerReport {
    pub fn from_blogs(blogs: Vec<ArchivedBlog>, pricing: &PricingConfig) -> Self {
        let model = blogs
            .first()
            .map(|b| b.model.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        Self {
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            model,
            total_input_tokens: blogs.iter().map(|b| b.input_tokens).sum(),
            total_output_tokens: blogs.iter().map(|b| b.output_tokens).sum(),
            total_cost: blogs.iter().map(|b| b.cost).sum(),
            blogs,
            pricing: pricing.clone(),
        }
    }

    pub fn blog_count(&self) -> usize {
        self.blogs.len()
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_input_tokens + self.total_output_tokens
    }

    pub fn average_cost(&self) -> f64 {
        if self.blogs.is_empty() {
            0.0
        } else {
            self.total_cost / self.blogs.len() as f64
        }
    }

    pub fn cost_per_1k_tokens(&self) -> f64 {
        match self.total_tokens() {
            0 => 0.0,
            tokens => self.total_cost * 1000.0 / tokens as f64,
        }
    }

    pub fn average_tokens(&self) -> f64 {
        if self.blogs.is_empty() {
            0.0
        } else {
            self.total_tokens() as f64 / self.blogs.len() as f64
        }
    }

    pub fn input_cost(&self) -> f64 {
        self.total_input_tokens as f64 * self.pricing.input_per_1k / 1000.0
    }

    pub fn output_cost(&self) -> f64 {
        self.total_output_tokens as f64 * self.pricing.output_per_1k / 1000.0
    }

    /// Text written to the manager report file.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Fixed-width per-blog table for the terminal.
    pub fn console_table(&self) -> String {
        ConsoleTable(self).to_string()
    }
}

impl fmt::Display for ManagerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BLOG GENERATION - TOKEN USAGE AND COST REPORT")?;
        writeln!(f, "{}\n", "=".repeat(60))?;
        writeln!(f, "Report Generated: {}", self.generated_at)?;
        writeln!(f, "Project: Blog Generation Agent\n")?;

        writeln!(f, "SUMMARY:")?;
        writeln!(f, "{}", "-".repeat(30))?;
        writeln!(f, "Model Used: {}", self.model)?;
        writeln!(f, "Total Blogs: {}", self.blog_count())?;
        writeln!(f, "Total Input Tokens: {}", with_thousands(self.total_input_tokens))?;
        writeln!(f, "Total Output Tokens: {}", with_thousands(self.total_output_tokens))?;
        writeln!(f, "Total Tokens: {}", with_thousands(self.total_tokens()))?;
        writeln!(f, "Total Cost: ${:.4}", self.total_cost)?;
        writeln!(f, "Average Cost per Blog: ${:.4}", self.average_cost())?;
        writeln!(f, "Cost per 1,000 tokens: ${:.4}\n", self.cost_per_1k_tokens())?;

        writeln!(f, "PRICING BREAKDOWN:")?;
        writeln!(f, "{}", "-".repeat(30))?;
        writeln!(
            f,
            "Input Token Cost (${}/1K): ${:.4}",
            self.pricing.input_per_1k,
            self.input_cost()
        )?;
        writeln!(
            f,
            "Output Token Cost (${}/1K): ${:.4}\n",
            self.pricing.output_per_1k,
            self.output_cost()
        )?;

        writeln!(f, "INDIVIDUAL BLOG DETAILS:")?;
        writeln!(f, "{}", "-".repeat(30))?;
        for (i, blog) in self.blogs.iter().enumerate() {
            writeln!(f, "\nBlog {}: {}", i + 1, blog.topic)?;
            writeln!(f, "  Input Tokens: {}", with_thousands(blog.input_tokens))?;
            writeln!(f, "  Output Tokens: {}", with_thousands(blog.output_tokens))?;
            writeln!(f, "  Total Tokens: {}", with_thousands(blog.total_tokens()))?;
            writeln!(f, "  Word Count: {}", blog.word_count)?;
            writeln!(f, "  Cost: ${:.4}", blog.cost)?;
        }
        Ok(())
    }
}

struct ConsoleTable<'a>(&'a ManagerReport);

impl fmt::Display for ConsoleTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(80);
        writeln!(f, "{rule}")?;
        writeln!(f, "{:<3} {:<35} {:<8} {:<6} {:<8}", "#", "Topic", "Tokens", "Words", "Cost")?;
        writeln!(f, "{rule}")?;
        for (i, blog) in self.0.blogs.iter().enumerate() {
            writeln!(
                f,
                "{:<3} {:<35} {:<8} {:<6} ${:<7.4}",
                i + 1,
                short_topic(&blog.topic),
                with_thousands(blog.total_tokens()),
                blog.word_count,
                blog.cost
            )?;
        }
        Ok(())
    }
}

fn short_topic(topic: &str) -> String {
    if topic.chars().count() > CONSOLE_TOPIC_LEN {
        let head: String = topic.chars().take(CONSOLE_TOPIC_LEN).collect();
        format!("{head}...")
    } else {
        topic.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archived(topic: &str, input: u64, output: u64, cost: f64) -> ArchivedBlog {
        ArchivedBlog {
            file_name: format!("blog_01_{topic}.txt"),
            topic: topic.to_string(),
            model: "gpt-4o".to_string(),
            input_tokens: input,
            output_tokens: output,
            word_count: 900,
            cost,
        }
    }

    fn pricing() -> PricingConfig {
        PricingConfig {
            input_per_1k: 0.005,
            output_per_1k: 0.015,
        }
    }

    #[test]
    fn totals_and_averages() {
        let report = ManagerReport::from_blogs(
            vec![
                archived("Edge AI", 1000, 3000, 0.05),
                archived("AI Search", 2000, 2000, 0.04),
            ],
            &pricing(),
        );
        assert_eq!(report.total_tokens(), 8000);
        assert!((report.total_cost - 0.09).abs() < 1e-12);
        assert!((report.average_cost() - 0.045).abs() < 1e-12);
        assert!((report.cost_per_1k_tokens() - 0.01125).abs() < 1e-12);
        assert!((report.input_cost() - 0.015).abs() < 1e-12);
        assert!((report.output_cost() - 0.075).abs() < 1e-12);
        assert_eq!(report.model, "gpt-4o");
    }

    #[test]
    fn empty_archive_has_zero_rates() {
        let report = ManagerReport::from_blogs(vec![], &pricing());
        assert_eq!(report.average_cost(), 0.0);
        assert_eq!(report.cost_per_1k_tokens(), 0.0);
        assert_eq!(report.model, "Unknown");
    }

    #[test]
    fn render_has_all_sections() {
        let report =
            ManagerReport::from_blogs(vec![archived("Edge AI", 2000, 2000, 0.04)], &pricing());
        let text = report.render();
        assert!(text.starts_with("BLOG GENERATION - TOKEN USAGE AND COST REPORT\n"));
        for section in ["SUMMARY:", "PRICING BREAKDOWN:", "INDIVIDUAL BLOG DETAILS:"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("Total Tokens: 4,000"));
        assert!(text.contains("Input Token Cost ($0.005/1K): $0.0100"));
        assert!(text.contains("\nBlog 1: Edge AI\n"));
    }

    #[test]
    fn console_truncates_long_topics() {
        let topic = "Why retrieval augmented generation beats fine tuning";
        let report = ManagerReport::from_blogs(vec![archived(topic, 10, 10, 0.001)], &pricing());
        let table = report.console_table();
        assert!(table.contains("Why retrieval augmented generation..."));
        assert!(!table.contains("beats"));
    }
}
