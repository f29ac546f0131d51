use crate::store::blog_files;
use blog_models::BlogError;
use std::path::Path;

const PREVIEW_LINES: usize = 20;

/// Whether archived blogs carry usage and cost lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostCheck {
    pub files: usize,
    pub first_file: Option<String>,
    pub preview: Vec<String>,
    pub has_tokens: bool,
    pub has_cost: bool,
}

impl CostCheck {
    pub fn is_tracked(&self) -> bool {
        self.has_tokens && self.has_cost
    }
}

/// Inspects the first blog file in `dir`.
pub fn check_costs(dir: &Path) -> Result<CostCheck, BlogError> {
    let files = blog_files(dir)?;
    let mut check = CostCheck {
        files: files.len(),
        ..CostCheck::default()
    };
    let Some(first) = files.first() else {
        return Ok(check);
    };

    let content = std::fs::read_to_string(first)?;
    check.first_file = first
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    check.preview = content
        .lines()
        .take(PREVIEW_LINES)
        .map(str::to_string)
        .collect();
    check.has_tokens = content.contains("Input Tokens:");
    check.has_cost = content.contains("Cost:");
    Ok(check)
}
