use crate::config::{BadFilePolicy, Config, Order};
use crate::dataset::{CdfOpener, DataFile, Opener};
use crate::dates::DateRange;
use crate::error::ExtractError;
use crate::naming::{DotField, FileDater};
use crate::stats::summarize;
use chrono::NaiveDate;
use glob::{MatchOptions, Pattern, glob_with};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Summary of one data file's variable, keyed by the file's date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateValueRecord {
    pub date: NaiveDate,
    pub value: f64,
}

/// Data file found by [`Extractor::scan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanEntry {
    pub file: PathBuf,
    pub date: NaiveDate,
    pub variables: Vec<String>,
}

/// Reduces a variable of every data file in a date range to one value per file.
pub struct Extractor<O: Opener = CdfOpener> {
    cfg: Config,
    dater: Box<dyn FileDater>,
    opener: O,
}

impl Extractor<CdfOpener> {
    pub fn new(cfg: Config) -> Self {
        let dater = Box::new(DotField::new(cfg.date_field));
        let opener = CdfOpener {
            mask_and_scale: cfg.mask_and_scale,
        };
        Self::with_parts(cfg, dater, opener)
    }
}

impl<O: Opener> Extractor<O> {
    pub fn with_parts(cfg: Config, dater: Box<dyn FileDater>, opener: O) -> Self {
        Self { cfg, dater, opener }
    }

    /// Extract `variable` over the inclusive range `start_date..=end_date`
    /// (both `YYYYMMDD`) and serialize the records as a JSON array.
    pub fn to_json(
        &self,
        variable: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<String, ExtractError> {
        let records = self.records(variable, start_date, end_date)?;
        Ok(serde_json::to_string(&records)?)
    }

    /// Same as [`Extractor::to_json`], without serialization.
    pub fn records(
        &self,
        variable: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<DateValueRecord>, ExtractError> {
        // Arguments are checked before the filesystem is touched.
        let range = DateRange::parse(start_date, end_date)?;

        let mut records = Vec::new();
        for (path, date) in self.dated_files(range)? {
            match self.reduce_file(&path, variable) {
                Ok(value) => {
                    log::debug!("{path:?}: {value}");
                    records.push(DateValueRecord { date, value });
                }
                Err(err) if self.skips(&err) => log::warn!("skipped {path:?}: {err}"),
                Err(err) => return Err(err),
            }
        }

        if self.cfg.order == Order::Chronological {
            records.sort_by_key(|record| record.date);
        }

        log::info!("extracted {} records of {variable:?}", records.len());
        Ok(records)
    }

    /// List the data files in the inclusive range with their variables.
    pub fn scan(&self, start_date: &str, end_date: &str) -> Result<Vec<ScanEntry>, ExtractError> {
        let range = DateRange::parse(start_date, end_date)?;

        let mut entries = Vec::new();
        for (path, date) in self.dated_files(range)? {
            match self.opener.open(&path) {
                Ok(file) => entries.push(ScanEntry {
                    variables: file.variables(),
                    file: path,
                    date,
                }),
                Err(err) if self.skips(&err) => log::warn!("skipped {path:?}: {err}"),
                Err(err) => return Err(err),
            }
        }

        if self.cfg.order == Order::Chronological {
            entries.sort_by_key(|entry| entry.date);
        }

        Ok(entries)
    }

    fn skips(&self, err: &ExtractError) -> bool {
        self.cfg.on_bad_file == BadFilePolicy::Skip && err.is_per_file()
    }

    fn reduce_file(&self, path: &Path, variable: &str) -> Result<f64, ExtractError> {
        let mut file = self.opener.open(path)?;

        if !file.variables().iter().any(|name| name == variable) {
            return Err(ExtractError::VariableNotFound {
                variable: variable.to_string(),
                path: path.to_path_buf(),
            });
        }

        let vals = file.read_variable(variable)?;
        summarize(&vals, self.cfg.stat).ok_or_else(|| ExtractError::EmptyVariable {
            variable: variable.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Data files whose date lies in `range`, in enumeration order.
    fn dated_files(&self, range: DateRange) -> Result<Vec<(PathBuf, NaiveDate)>, ExtractError> {
        let mut dated = Vec::new();
        for path in self.data_files()? {
            match self.dater.date_of(&path) {
                Ok(date) if range.contains(date) => dated.push((path, date)),
                Ok(_) => {}
                Err(err) if self.cfg.on_bad_file == BadFilePolicy::Skip => {
                    log::warn!("skipped {path:?}: {err}");
                }
                Err(err) => return Err(err),
            }
        }
        log::info!(
            "{} data files between {} and {}",
            dated.len(),
            range.start,
            range.end
        );
        Ok(dated)
    }

    fn data_files(&self) -> Result<Vec<PathBuf>, ExtractError> {
        let data_dir = self.data_dir()?;
        let data_dir = data_dir.to_str().ok_or_else(|| {
            ExtractError::Configuration(format!("data directory {data_dir:?} is not valid UTF-8"))
        })?;

        let pattern = Path::new(&Pattern::escape(data_dir)).join(&self.cfg.pattern);
        let pattern = pattern
            .to_str()
            .ok_or_else(|| ExtractError::Configuration("pattern is not valid UTF-8".to_string()))?;

        // Hidden files (e.g. `._*` resource forks) are never data files.
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut files = Vec::new();
        for path in glob_with(pattern, options)
            .map_err(|err| ExtractError::Configuration(err.to_string()))?
        {
            let path = path?;
            if path.is_file() {
                files.push(path);
            }
        }
        log::debug!("{} files match {pattern:?}", files.len());
        Ok(files)
    }

    fn data_dir(&self) -> Result<&Path, ExtractError> {
        let data_dir = self.cfg.data_dir.as_path();
        if data_dir.as_os_str().is_empty() {
            return Err(ExtractError::Configuration(
                "data directory is not set".to_string(),
            ));
        }
        if !data_dir.is_dir() {
            return Err(ExtractError::Configuration(format!(
                "data directory {data_dir:?} does not exist or is not a directory"
            )));
        }
        Ok(data_dir)
    }
}
