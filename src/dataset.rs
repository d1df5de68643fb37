//! Access to the variables stored in scientific data files.

use crate::error::ExtractError;
use netcdf3::{
    Attribute, DataVector, FileReader, NC_FILL_F32, NC_FILL_F64, NC_FILL_I16, NC_FILL_I32,
    Variable,
};
use std::path::{Path, PathBuf};

/// An opened data file. Dropping it releases the underlying handle.
pub trait DataFile {
    /// Names of all variables, sorted.
    fn variables(&self) -> Vec<String>;

    /// All valid values of a variable, flattened, as `f64`.
    fn read_variable(&mut self, name: &str) -> Result<Vec<f64>, ExtractError>;
}

/// Opens data files by path.
pub trait Opener {
    type File: DataFile;

    fn open(&self, path: &Path) -> Result<Self::File, ExtractError>;
}

/// Opens NetCDF-3 files (classic and 64-bit offset).
#[derive(Debug, Clone, Copy)]
pub struct CdfOpener {
    pub mask_and_scale: bool,
}

impl Opener for CdfOpener {
    type File = CdfFile;

    fn open(&self, path: &Path) -> Result<CdfFile, ExtractError> {
        CdfFile::open(path, self.mask_and_scale)
    }
}

pub struct CdfFile {
    path: PathBuf,
    reader: FileReader,
    mask_and_scale: bool,
}

impl CdfFile {
    pub fn open<P: AsRef<Path>>(path: P, mask_and_scale: bool) -> Result<Self, ExtractError> {
        let path = path.as_ref().to_path_buf();
        let reader = FileReader::open(&path).map_err(|err| ExtractError::DataFileOpen {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            path,
            reader,
            mask_and_scale,
        })
    }
}

impl DataFile for CdfFile {
    fn variables(&self) -> Vec<String> {
        let mut names = self.reader.data_set().get_var_names();
        names.sort();
        names
    }

    fn read_variable(&mut self, name: &str) -> Result<Vec<f64>, ExtractError> {
        if !self.reader.data_set().has_var(name) {
            return Err(ExtractError::VariableNotFound {
                variable: name.to_string(),
                path: self.path.clone(),
            });
        }

        let data = self
            .reader
            .read_var(name)
            .map_err(|err| ExtractError::DataFileOpen {
                path: self.path.clone(),
                reason: format!("failed to read variable {name:?}: {err}"),
            })?;
        let (vals, default_fill) = widen(data);

        if !self.mask_and_scale {
            return Ok(vals);
        }

        let var = self
            .reader
            .data_set()
            .get_var(name)
            .ok_or_else(|| ExtractError::VariableNotFound {
                variable: name.to_string(),
                path: self.path.clone(),
            })?;
        let mask = Mask::from_variable(var, default_fill);
        let scale = first_value(var, "scale_factor").unwrap_or(1.0);
        let offset = first_value(var, "add_offset").unwrap_or(0.0);

        Ok(vals
            .into_iter()
            .filter(|&val| mask.is_valid(val))
            .map(|val| val * scale + offset)
            .collect())
    }
}

/// Converts raw data to `f64` and returns the default fill value of its type.
///
/// Byte and char data have no default fill, matching the NetCDF conventions.
fn widen(data: DataVector) -> (Vec<f64>, Option<f64>) {
    match data {
        DataVector::I8(vals) => (vals.into_iter().map(f64::from).collect(), None),
        DataVector::U8(vals) => (vals.into_iter().map(f64::from).collect(), None),
        DataVector::I16(vals) => (
            vals.into_iter().map(f64::from).collect(),
            Some(f64::from(NC_FILL_I16)),
        ),
        DataVector::I32(vals) => (
            vals.into_iter().map(f64::from).collect(),
            Some(f64::from(NC_FILL_I32)),
        ),
        DataVector::F32(vals) => (
            vals.into_iter().map(f64::from).collect(),
            Some(f64::from(NC_FILL_F32)),
        ),
        DataVector::F64(vals) => (vals, Some(NC_FILL_F64)),
    }
}

fn numeric_values(attr: &Attribute) -> Vec<f64> {
    if let Some(vals) = attr.get_f64() {
        vals.to_vec()
    } else if let Some(vals) = attr.get_f32() {
        vals.iter().copied().map(f64::from).collect()
    } else if let Some(vals) = attr.get_i32() {
        vals.iter().copied().map(f64::from).collect()
    } else if let Some(vals) = attr.get_i16() {
        vals.iter().copied().map(f64::from).collect()
    } else if let Some(vals) = attr.get_i8() {
        vals.iter().copied().map(f64::from).collect()
    } else {
        // Text attribute.
        Vec::new()
    }
}

fn attr_values(var: &Variable, attr_name: &str) -> Vec<f64> {
    var.get_attr(attr_name)
        .map(numeric_values)
        .unwrap_or_default()
}

fn first_value(var: &Variable, attr_name: &str) -> Option<f64> {
    attr_values(var, attr_name).first().copied()
}

/// Elements excluded before reduction: fill and missing values, and values
/// outside the declared valid range. Compared on raw (packed) values.
struct Mask {
    invalid: Vec<f64>,
    valid_min: Option<f64>,
    valid_max: Option<f64>,
}

impl Mask {
    fn from_variable(var: &Variable, default_fill: Option<f64>) -> Self {
        let mut invalid = match first_value(var, "_FillValue") {
            Some(fill) => vec![fill],
            None => default_fill.into_iter().collect(),
        };
        invalid.extend(attr_values(var, "missing_value"));

        let (mut valid_min, mut valid_max) = match attr_values(var, "valid_range")[..] {
            [min, max] => (Some(min), Some(max)),
            _ => (None, None),
        };
        if let Some(min) = first_value(var, "valid_min") {
            valid_min = Some(min);
        }
        if let Some(max) = first_value(var, "valid_max") {
            valid_max = Some(max);
        }

        Self {
            invalid,
            valid_min,
            valid_max,
        }
    }

    fn is_valid(&self, val: f64) -> bool {
        if self
            .invalid
            .iter()
            .any(|&bad| bad == val || (bad.is_nan() && val.is_nan()))
        {
            return false;
        }
        self.valid_min.is_none_or(|min| val >= min) && self.valid_max.is_none_or(|max| val <= max)
    }
}
