//! Test helpers writing small NetCDF-3 files into scratch directories.

use netcdf3::{DataSet, FileWriter, Version};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Scratch directory under the system temp dir, removed on drop.
pub struct TempDir(PathBuf);

impl TempDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("cdf-series-{}-{name}", std::process::id()));
        fs::remove_dir_all(&path).ok();
        fs::create_dir_all(&path).expect("failed to create scratch directory");
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.0).ok();
    }
}

fn define(var_name: &str, dims: &[(usize, &str)], attrs: &[(&str, f64)], f64_var: bool) -> DataSet {
    let mut data_set = DataSet::new();
    for &(size, dim_name) in dims {
        data_set.add_fixed_dim(dim_name, size).unwrap();
    }
    let dim_names: Vec<&str> = dims.iter().map(|&(_, dim_name)| dim_name).collect();
    if f64_var {
        data_set.add_var_f64(var_name, &dim_names[..]).unwrap();
    } else {
        data_set.add_var_i16(var_name, &dim_names[..]).unwrap();
    }
    for &(attr_name, val) in attrs {
        data_set
            .add_var_attr_f64(var_name, attr_name, vec![val])
            .unwrap();
    }
    data_set
}

/// Write a file holding a single `f64` variable with the given dimensions.
pub fn write_f64_var(
    path: &Path,
    var_name: &str,
    dims: &[(usize, &str)],
    vals: &[f64],
    attrs: &[(&str, f64)],
) {
    let data_set = define(var_name, dims, attrs, true);
    let mut writer = FileWriter::open(path).unwrap();
    writer.set_def(&data_set, Version::Classic, 0).unwrap();
    writer.write_var_f64(var_name, vals).unwrap();
    writer.close().unwrap();
}

/// Write a file holding a single one-dimensional `i16` variable.
pub fn write_i16_var(path: &Path, var_name: &str, vals: &[i16], attrs: &[(&str, f64)]) {
    let data_set = define(var_name, &[(vals.len(), "x")], attrs, false);
    let mut writer = FileWriter::open(path).unwrap();
    writer.set_def(&data_set, Version::Classic, 0).unwrap();
    writer.write_var_i16(var_name, vals).unwrap();
    writer.close().unwrap();
}

/// Write a one-dimensional `temp_mean` series, the common case in tests.
pub fn write_series(dir: &Path, file_name: &str, vals: &[f64]) -> PathBuf {
    let path = dir.join(file_name);
    write_f64_var(&path, "temp_mean", &[(vals.len(), "time")], vals, &[]);
    path
}
