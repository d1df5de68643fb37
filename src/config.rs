use crate::stats::Statistic;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path, path::PathBuf};

/// Order of the extracted records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    /// Order in which data files are enumerated (by file name).
    #[default]
    Enumeration,
    /// Stable sort by file date.
    Chronological,
}

/// What to do with a file whose name, contents or variable are unusable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadFilePolicy {
    /// Fail the whole extraction.
    #[default]
    Abort,
    /// Log a warning and leave the file out.
    Skip,
}

/// Extraction configuration.
///
/// Loaded from a TOML file (see [`Config::from_file`]) or built with
/// [`Config::new`]; every field but `data_dir` has a default.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the data files. A relative path in a config file is
    /// taken relative to that file's directory.
    pub data_dir: PathBuf,
    /// Glob pattern of data file names inside `data_dir`.
    pub pattern: String,
    /// Dot-delimited field of the file name holding the `YYYYMMDD` date.
    pub date_field: usize,

    pub order: Order,
    pub on_bad_file: BadFilePolicy,

    /// Exclude fill and out-of-range values and unpack scaled data.
    pub mask_and_scale: bool,
    /// Statistic reducing each file's variable to one value.
    pub stat: Statistic,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            pattern: "*.cdf".to_string(),
            date_field: 2,
            order: Order::default(),
            on_bad_file: BadFilePolicy::default(),
            mask_and_scale: true,
            stat: Statistic::default(),
        }
    }
}

impl Config {
    /// Default configuration reading from `data_dir`.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let mut config: Config =
            toml::from_str(&contents).context("failed to deserialize config")?;

        if config.data_dir.is_relative() && !config.data_dir.as_os_str().is_empty() {
            if let Some(base) = file.parent() {
                config.data_dir = base.join(&config.data_dir);
            }
        }

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Checks values that can be judged without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        check_pattern(&self.pattern).context("invalid file name pattern")?;
        check_num(self.date_field, 0..16).context("invalid date field index")?;
        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        bail!("pattern must not be empty");
    }
    // Enumeration is not recursive.
    if pattern.contains('/') || pattern.contains(std::path::MAIN_SEPARATOR) {
        bail!("pattern must match file names only, but is {pattern:?}");
    }
    glob::Pattern::new(pattern).with_context(|| format!("{pattern:?} is not a glob pattern"))?;
    Ok(())
}
