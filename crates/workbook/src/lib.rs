//! Reads the "Key Insights" workbook: two keyword sheets, the website link
//! list and the topic backlog.

pub mod sheet;

pub use sheet::*;

use blog_models::{
    BlogError, Insights, LLM_KEYWORDS_SHEET, SEO_KEYWORDS_SHEET, TOPICS_SHEET, WEBSITE_SHEET,
};
use calamine::{open_workbook, Reader, Xlsx};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

pub const REQUIRED_SHEETS: [&str; 4] = [
    SEO_KEYWORDS_SHEET,
    LLM_KEYWORDS_SHEET,
    WEBSITE_SHEET,
    TOPICS_SHEET,
];

pub struct WorkbookReader {
    path: PathBuf,
}

impl WorkbookReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Insights, BlogError> {
        let sheets = self.read_sheets()?;
        assemble(sheets)
    }

    /// Loads every required sheet that is present; absent ones are reported
    /// by `assemble`.
    pub fn read_sheets(&self) -> Result<HashMap<String, Sheet>, BlogError> {
        if !self.path.exists() {
            return Err(BlogError::WorkbookNotFound {
                path: self.path.display().to_string(),
            });
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|e| BlogError::Workbook {
            reason: format!("{e}"),
        })?;

        let available = workbook.sheet_names().to_vec();
        info!(sheets = ?available, "Reading Excel file");

        let mut sheets = HashMap::new();
        for expected in REQUIRED_SHEETS {
            let Some(actual) = available.iter().find(|name| name.trim() == expected) else {
                warn!(sheet = expected, "Sheet not found");
                continue;
            };
            let range = workbook
                .worksheet_range(actual)
                .map_err(|e| BlogError::Workbook {
                    reason: format!("sheet '{actual}': {e}"),
                })?;
            let sheet = Sheet::from_range(&range);
            info!(sheet = expected, rows = sheet.len(), "Sheet loaded");
            debug!(sheet = expected, headers = ?sheet.headers, "Sheet columns");
            sheets.insert(expected.to_string(), sheet);
        }

        Ok(sheets)
    }
}

/// Builds typed insights; every required sheet must be present.
pub fn assemble(mut sheets: HashMap<String, Sheet>) -> Result<Insights, BlogError> {
    let mut take = |name: &str| {
        sheets.remove(name).ok_or_else(|| BlogError::MissingSheet {
            sheet: name.to_string(),
        })
    };

    let seo = take(SEO_KEYWORDS_SHEET)?;
    let llm = take(LLM_KEYWORDS_SHEET)?;
    let website = take(WEBSITE_SHEET)?;
    let topics = take(TOPICS_SHEET)?;

    Ok(Insights {
        seo_keywords: seo.to_keyword_table(),
        llm_keywords: llm.to_keyword_table(),
        website_links: website.to_links(),
        topics: topics.to_topics(),
    })
}
