use blog_models::{with_thousands, BlogError, BlogOutcome, GeneratedBlog};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const RULE: &str = "==================================================";
const SAFE_TOPIC_LEN: usize = 30;

/// A blog file read back from the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedBlog {
    pub file_name: String,
    pub topic: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub word_count: u64,
    pub cost: f64,
}

impl ArchivedBlog {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// `blog_<NN>_<topic>.txt`; spaces and slashes become `_`, topic capped at 30 chars.
pub fn blog_filename(index: usize, topic: &str) -> String {
    let safe: String = topic
        .chars()
        .map(|c| if c == ' ' || c == '/' { '_' } else { c })
        .take(SAFE_TOPIC_LEN)
        .collect();
    format!("blog_{index:02}_{safe}.txt")
}

fn is_blog_file(name: &str) -> bool {
    name.starts_with("blog_") && name.ends_with(".txt")
}

pub(crate) fn blog_files(dir: &Path) -> Result<Vec<PathBuf>, BlogError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if entry.file_type()?.is_file() && is_blog_file(&name.to_string_lossy()) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn now_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Directory of generated blog files (`generated_blogs/` by default).
#[derive(Debug, Clone)]
pub struct BlogArchive {
    dir: PathBuf,
}

impl BlogArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    pub fn ensure_dir(&self) -> Result<(), BlogError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn render_blog(blog: &GeneratedBlog) -> String {
        BlogFile(blog).to_string()
    }

    /// Writes one blog. `index` is 1-based.
    #[instrument(skip(self, blog), fields(topic = %blog.topic))]
    pub fn write_blog(&self, index: usize, blog: &GeneratedBlog) -> Result<PathBuf, BlogError> {
        self.ensure_dir()?;
        let path = self.dir.join(blog_filename(index, &blog.topic));
        std::fs::write(&path, Self::render_blog(blog))?;
        info!(path = %path.display(), word_count = blog.word_count, "Blog saved");
        Ok(path)
    }

    pub fn render_summary(attempted: usize, outcomes: &[BlogOutcome]) -> String {
        RunSummary {
            attempted,
            outcomes,
        }
        .to_string()
    }

    /// Writes `SUMMARY_<timestamp>.txt` for a run.
    pub fn write_summary(
        &self,
        attempted: usize,
        outcomes: &[BlogOutcome],
    ) -> Result<PathBuf, BlogError> {
        self.ensure_dir()?;
        let name = format!(
            "SUMMARY_{}.txt",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.dir.join(name);
        std::fs::write(&path, Self::render_summary(attempted, outcomes))?;
        info!(path = %path.display(), "Summary saved");
        Ok(path)
    }

    /// Parses every `blog_*.txt` in filename order. Files without topic,
    /// token or cost lines are skipped.
    pub fn scan(&self) -> Result<Vec<ArchivedBlog>, BlogError> {
        let parser = BlogFileParser::new()?;
        let mut blogs = Vec::new();
        for path in blog_files(&self.dir)? {
            let content = std::fs::read_to_string(&path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match parser.parse(&file_name, &content) {
                Some(blog) => blogs.push(blog),
                None => warn!(file = %file_name, "Skipping blog file without usage data"),
            }
        }
        debug!(count = blogs.len(), "Archive scanned");
        Ok(blogs)
    }
}

/// Header block followed by the post body.
struct BlogFile<'a>(&'a GeneratedBlog);

impl fmt::Display for BlogFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blog = self.0;
        writeln!(f, "BLOG GENERATION REPORT")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Topic: {}", blog.topic)?;
        writeln!(
            f,
            "Generated: {}",
            blog.generated_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "Model Used: {}", blog.model_used)?;
        writeln!(f, "Word Count: {}", blog.word_count)?;
        writeln!(f, "Input Tokens: {}", with_thousands(blog.usage.input_tokens))?;
        writeln!(f, "Output Tokens: {}", with_thousands(blog.usage.output_tokens))?;
        writeln!(f, "Total Tokens: {}", with_thousands(blog.usage.total_tokens))?;
        writeln!(f, "Cost: ${:.4}", blog.cost)?;
        writeln!(f, "SEO Keywords: {}", blog.seo_keywords_used.join(", "))?;
        writeln!(f, "LLM Keywords: {}", blog.llm_keywords_used.join(", "))?;
        writeln!(f, "Links Used: {}", blog.links_used.join(", "))?;
        write!(f, "\n{RULE}\n\n{}", blog.content)
    }
}

struct RunSummary<'a> {
    attempted: usize,
    outcomes: &'a [BlogOutcome],
}

impl fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let successful = self.outcomes.iter().filter(|o| o.is_success()).count();
        writeln!(f, "BLOG GENERATION SUMMARY")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Generation Date: {}", now_stamp())?;
        writeln!(f, "Total Blogs Attempted: {}", self.attempted)?;
        writeln!(f, "Successfully Generated: {successful}")?;
        writeln!(f, "Failed: {}\n", self.attempted.saturating_sub(successful))?;
        writeln!(f, "BLOG DETAILS:")?;
        writeln!(f, "{}", "-".repeat(30))?;

        for (i, outcome) in self.outcomes.iter().enumerate() {
            writeln!(f, "\nBlog {}: {}", i + 1, outcome.topic())?;
            writeln!(f, "Status: {}", outcome.status().as_str())?;
            match outcome {
                BlogOutcome::Success(blog) => {
                    writeln!(f, "Word Count: {}", blog.word_count)?;
                    writeln!(f, "SEO Keywords: {}", blog.seo_keywords_used.join(", "))?;
                    writeln!(f, "LLM Keywords: {}", blog.llm_keywords_used.join(", "))?;
                }
                BlogOutcome::Failed { error, .. } => writeln!(f, "Error: {error}")?,
            }
            writeln!(f, "{}", "-".repeat(20))?;
        }
        Ok(())
    }
}

struct BlogFileParser {
    topic: Regex,
    input_tokens: Regex,
    output_tokens: Regex,
    cost: Regex,
    word_count: Regex,
    model: Regex,
}

impl BlogFileParser {
    fn new() -> Result<Self, BlogError> {
        let re = |pattern: &str| {
            Regex::new(pattern).map_err(|e| BlogError::Internal {
                reason: e.to_string(),
            })
        };
        Ok(Self {
            topic: re(r"Topic: (.+)")?,
            input_tokens: re(r"Input Tokens: ([\d,]+)")?,
            output_tokens: re(r"Output Tokens: ([\d,]+)")?,
            cost: re(r"Cost: \$([\d.]+)")?,
            word_count: re(r"Word Count: (\d+)")?,
            model: re(r"Model Used: (.+)")?,
        })
    }

    fn capture<'a>(re: &Regex, content: &'a str) -> Option<&'a str> {
        re.captures(content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
    }

    fn tokens(re: &Regex, content: &str) -> Option<u64> {
        Self::capture(re, content)?.replace(',', "").parse().ok()
    }

    fn parse(&self, file_name: &str, content: &str) -> Option<ArchivedBlog> {
        let topic = Self::capture(&self.topic, content)?;
        let input_tokens = Self::tokens(&self.input_tokens, content)?;
        let output_tokens = Self::tokens(&self.output_tokens, content)?;
        let cost = Self::capture(&self.cost, content)?.parse().ok()?;
        let word_count = Self::capture(&self.word_count, content)
            .and_then(|w| w.parse().ok())
            .unwrap_or(0);
        let model = Self::capture(&self.model, content).unwrap_or("Unknown");

        Some(ArchivedBlog {
            file_name: file_name.to_string(),
            topic: topic.to_string(),
            model: model.to_string(),
            input_tokens,
            output_tokens,
            word_count,
            cost,
        })
    }
}
