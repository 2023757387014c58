//! Time-slice loading
//!
//! Opens every `*.nc` file in a directory and merges the slices into one
//! dataset. Variables on the time axis are concatenated along it; every other
//! variable is taken once, from the first slice that carries it.

use crate::dataset::{Dataset, Dimension, Variable, VariableData};
use crate::errors::{Result, ReshapeError};
use crate::netcdf_io::read_dataset;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the files picked up from the input directory
pub const SLICE_EXTENSION: &str = "nc";

/// List the `*.nc` files directly inside `directory`, sorted by name.
pub fn find_slice_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        let is_slice = path.is_file()
            && path
                .extension()
                .map_or(false, |ext| ext == OsStr::new(SLICE_EXTENSION));
        if is_slice {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read all time slices in `input_directory` into one dataset.
///
/// # Errors
///
/// * `InvalidInput` if `input_directory` is empty (no file is touched)
/// * `NoInputFiles` if the directory holds no `*.nc` file
/// * `InconsistentSlices` / `TypeMismatch` if the slices cannot be merged
/// * netCDF and I/O errors from reading, unmodified
pub fn read_time_slices(input_directory: &Path, time_dim: &str) -> Result<Dataset> {
    if input_directory.as_os_str().is_empty() {
        return Err(ReshapeError::InvalidInput {
            message: "input_directory must be specified".to_string(),
        });
    }

    let paths = find_slice_files(input_directory)?;
    if paths.is_empty() {
        return Err(ReshapeError::NoInputFiles {
            directory: input_directory.to_path_buf(),
        });
    }

    log::info!(
        "Reading {} time-slice files from {} on {} threads",
        paths.len(),
        input_directory.display(),
        rayon::current_num_threads()
    );

    let slices = paths
        .par_iter()
        .map(|path| read_dataset(path))
        .collect::<Result<Vec<_>>>()?;

    merge_time_slices(slices, time_dim)
}

/// First value of each slice's time coordinate, when every slice has one.
fn time_keys(slices: &[Dataset], time_dim: &str) -> Option<Vec<f64>> {
    slices
        .iter()
        .map(|slice| {
            slice
                .coordinate_variable(time_dim)
                .and_then(|coord| coord.data().first_as_f64())
        })
        .collect()
}

/// Attributes that define how raw time values map onto dates
const TIME_ENCODING_ATTRIBUTES: [&str; 2] = ["units", "calendar"];

/// Raw time values are only comparable when every slice encodes them the same way.
fn check_time_encoding(slices: &[Dataset], time_dim: &str) -> Result<()> {
    let mut coords = slices
        .iter()
        .enumerate()
        .filter_map(|(index, slice)| slice.coordinate_variable(time_dim).map(|c| (index, c)));

    let Some((_, reference)) = coords.next() else {
        return Ok(());
    };

    for (index, coord) in coords {
        for attr in TIME_ENCODING_ATTRIBUTES {
            if coord.attribute(attr) != reference.attribute(attr) {
                return Err(ReshapeError::InconsistentSlices {
                    message: format!(
                        "'{}' {} is {:?} in slice {} but {:?} in the first slice",
                        time_dim,
                        attr,
                        coord.attribute(attr),
                        index,
                        reference.attribute(attr)
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Merge individually read time slices into one dataset along `time_dim`.
///
/// Slices are put in time order when every slice has a time coordinate, and
/// otherwise kept in the order given. Time coordinates must share their
/// `units` and `calendar`, and a variable off the time axis must hold the
/// same values in every slice that carries it.
pub fn merge_time_slices(mut slices: Vec<Dataset>, time_dim: &str) -> Result<Dataset> {
    if slices.is_empty() {
        return Err(ReshapeError::InconsistentSlices {
            message: "no time slices to merge".to_string(),
        });
    }

    check_time_encoding(&slices, time_dim)?;

    if let Some(keys) = time_keys(&slices, time_dim) {
        let mut keyed: Vec<(f64, Dataset)> = keys.into_iter().zip(slices).collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        slices = keyed.into_iter().map(|(_, slice)| slice).collect();
    }

    if slices.len() == 1 {
        return Ok(slices.remove(0));
    }

    let mut merged = Dataset::new();
    merged.set_attributes(slices[0].attributes().to_vec());

    for dim in merged_dimensions(&slices, time_dim)? {
        merged.add_dimension(dim)?;
    }

    // Union of variable names, in order of first appearance
    let mut names: Vec<String> = Vec::new();
    for slice in &slices {
        for var in slice.variables() {
            if !names.iter().any(|n| n == var.name()) {
                names.push(var.name().to_string());
            }
        }
    }

    for name in &names {
        let first = slices
            .iter()
            .find_map(|slice| slice.variable(name))
            .ok_or_else(|| ReshapeError::VariableNotFound { var: name.clone() })?;

        let variable = if first.depends_on(time_dim) {
            concatenate_along_time(&slices, first, time_dim)?
        } else {
            check_constant_across_slices(&slices, first)?;
            first.clone()
        };
        merged.insert_variable(variable)?;
    }

    log::debug!(
        "Merged {} slices into {} variables",
        slices.len(),
        merged.variables().len()
    );

    Ok(merged)
}

/// Dimensions of the merged dataset: the time axis summed over all slices,
/// every other axis required to agree between slices.
fn merged_dimensions(slices: &[Dataset], time_dim: &str) -> Result<Vec<Dimension>> {
    let mut dims: Vec<Dimension> = Vec::new();

    for (index, slice) in slices.iter().enumerate() {
        if slice.dimension(time_dim).is_none() {
            return Err(ReshapeError::InconsistentSlices {
                message: format!("slice {} has no '{}' dimension", index, time_dim),
            });
        }

        for dim in slice.dimensions() {
            match dims.iter_mut().find(|d| d.name == dim.name) {
                Some(existing) if dim.name == time_dim => existing.len += dim.len,
                Some(existing) if existing.len != dim.len => {
                    return Err(ReshapeError::InconsistentSlices {
                        message: format!(
                            "dimension '{}' has length {} in slice {} but {} earlier",
                            dim.name, dim.len, index, existing.len
                        ),
                    });
                }
                Some(_) => {}
                None => dims.push(dim.clone()),
            }
        }
    }

    Ok(dims)
}

fn check_constant_across_slices(slices: &[Dataset], first: &Variable) -> Result<()> {
    for (index, slice) in slices.iter().enumerate() {
        let Some(var) = slice.variable(first.name()) else {
            continue;
        };
        if var.shares_data_with(first) {
            continue;
        }
        if var.dimensions() != first.dimensions() || !var.data().same_values(first.data()) {
            return Err(ReshapeError::InconsistentSlices {
                message: format!(
                    "time-independent variable '{}' differs between slices (slice {})",
                    first.name(),
                    index
                ),
            });
        }
    }
    Ok(())
}

fn concatenate_along_time(slices: &[Dataset], first: &Variable, time_dim: &str) -> Result<Variable> {
    let name = first.name();
    let axis = first
        .dimensions()
        .iter()
        .position(|d| d == time_dim)
        .ok_or_else(|| ReshapeError::DimensionMismatch {
            name: name.to_string(),
            message: format!("does not depend on '{}'", time_dim),
        })?;

    let mut parts: Vec<&VariableData> = Vec::with_capacity(slices.len());
    for (index, slice) in slices.iter().enumerate() {
        let var = slice
            .variable(name)
            .ok_or_else(|| ReshapeError::InconsistentSlices {
                message: format!("time-dependent variable '{}' is missing from slice {}", name, index),
            })?;
        if var.dimensions() != first.dimensions() {
            return Err(ReshapeError::InconsistentSlices {
                message: format!(
                    "variable '{}' has dimensions [{}] in slice {} but [{}] earlier",
                    name,
                    var.dimensions().join(", "),
                    index,
                    first.dimensions().join(", ")
                ),
            });
        }
        parts.push(var.data());
    }

    first.with_data(VariableData::concatenate(name, axis, &parts)?)
}
