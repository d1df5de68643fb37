use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while extracting a date series.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("failed to parse date from {input:?}: {reason}")]
    DateParse { input: String, reason: String },

    #[error("failed to enumerate data files")]
    Enumeration(#[from] glob::GlobError),

    #[error("failed to open data file {path:?}: {reason}")]
    DataFileOpen { path: PathBuf, reason: String },

    #[error("variable {variable:?} not found in {path:?}")]
    VariableNotFound { variable: String, path: PathBuf },

    #[error("variable {variable:?} has no valid values in {path:?}")]
    EmptyVariable { variable: String, path: PathBuf },

    #[error("failed to serialize records")]
    Serialize(#[from] serde_json::Error),
}

impl ExtractError {
    /// Whether the error concerns a single data file rather than the whole call.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::DataFileOpen { .. } | Self::VariableNotFound { .. } | Self::EmptyVariable { .. }
        )
    }
}
