//! Compact date parsing and inclusive date ranges.

use crate::error::ExtractError;
use chrono::NaiveDate;

const COMPACT_FORMAT: &str = "%Y%m%d";

/// Parse a date written as exactly eight digits, `YYYYMMDD`.
///
/// Unlike a bare `%Y%m%d` parse, this rejects signs, padding and any length
/// other than eight.
pub fn parse_compact(input: &str) -> Result<NaiveDate, ExtractError> {
    let fail = |reason: &str| ExtractError::DateParse {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail("expected exactly eight digits (YYYYMMDD)"));
    }

    NaiveDate::parse_from_str(input, COMPACT_FORMAT).map_err(|err| fail(&err.to_string()))
}

/// Closed interval of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse both bounds with [`parse_compact`].
    pub fn parse(start: &str, end: &str) -> Result<Self, ExtractError> {
        Ok(Self::new(parse_compact(start)?, parse_compact(end)?))
    }

    /// Both bounds are included. A reversed range contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
