use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorShape {
    pub error: String,
    pub error_type: String,
}

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("Excel file not found at {path}")]
    WorkbookNotFound { path: String },

    #[error("Sheet '{sheet}' not found")]
    MissingSheet { sheet: String },

    #[error("Error reading Excel file: {reason}")]
    Workbook { reason: String },

    #[error("Invalid topic selection")]
    InvalidTopic,

    #[error("{reason}")]
    InvalidRequest { reason: String },

    #[error("Maximum {max} blogs per request")]
    BatchTooLarge { max: usize },

    #[error("OpenAI error: {reason}")]
    OpenAi { reason: String },

    #[error("OpenAI connection failed")]
    OpenAiConnection,

    #[error("Airtable API error: {reason}")]
    Airtable { reason: String },

    #[error("Google Sheets error: {reason}")]
    Sheets { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Internal server error: {reason}")]
    Internal { reason: String },
}

impl BlogError {
    pub fn to_error_shape(&self) -> ErrorShape {
        ErrorShape {
            error: self.to_string(),
            error_type: self.error_type().to_string(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            BlogError::WorkbookNotFound { .. } => "WorkbookNotFound",
            BlogError::MissingSheet { .. } => "MissingSheet",
            BlogError::Workbook { .. } => "WorkbookError",
            BlogError::InvalidTopic => "InvalidTopic",
            BlogError::InvalidRequest { .. } => "InvalidRequest",
            BlogError::BatchTooLarge { .. } => "InvalidRequest",
            BlogError::OpenAi { .. } => "UpstreamError",
            BlogError::OpenAiConnection => "UpstreamError",
            BlogError::Airtable { .. } => "UpstreamError",
            BlogError::Sheets { .. } => "UpstreamError",
            BlogError::Io(_) => "ServiceException",
            BlogError::Config { .. } => "ConfigError",
            BlogError::Internal { .. } => "ServiceException",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            BlogError::WorkbookNotFound { .. } => 500,
            BlogError::MissingSheet { .. } => 500,
            BlogError::Workbook { .. } => 500,
            BlogError::InvalidTopic => 400,
            BlogError::InvalidRequest { .. } => 400,
            BlogError::BatchTooLarge { .. } => 400,
            BlogError::OpenAi { .. } => 500,
            BlogError::OpenAiConnection => 500,
            BlogError::Airtable { .. } => 502,
            BlogError::Sheets { .. } => 502,
            BlogError::Io(_) => 500,
            BlogError::Config { .. } => 500,
            BlogError::Internal { .. } => 500,
        }
    }
}
