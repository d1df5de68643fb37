//! Conventions mapping a data file name to the date it covers.

use crate::dates::parse_compact;
use crate::error::ExtractError;
use chrono::NaiveDate;
use std::path::Path;

/// Derives the date of a data file from its path.
pub trait FileDater {
    fn date_of(&self, path: &Path) -> Result<NaiveDate, ExtractError>;
}

/// Takes the `index`-th dot-delimited field of the file name as a `YYYYMMDD`
/// date, e.g. field 2 of `sst.daily.20151020.cdf`.
///
/// Only the final path component is split, so dots in parent directories
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotField {
    pub index: usize,
}

impl DotField {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Default for DotField {
    fn default() -> Self {
        Self::new(2)
    }
}

impl FileDater for DotField {
    fn date_of(&self, path: &Path) -> Result<NaiveDate, ExtractError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ExtractError::DateParse {
                input: path.display().to_string(),
                reason: "file name is missing or not valid UTF-8".to_string(),
            })?;

        let field = name
            .split('.')
            .nth(self.index)
            .ok_or_else(|| ExtractError::DateParse {
                input: name.to_string(),
                reason: format!("file name has no dot-delimited field {}", self.index),
            })?;

        parse_compact(field).map_err(|err| match err {
            ExtractError::DateParse { reason, .. } => ExtractError::DateParse {
                input: name.to_string(),
                reason: format!("field {} {field:?}: {reason}", self.index),
            },
            other => other,
        })
    }
}
