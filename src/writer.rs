//! Persisting time-series datasets
//!
//! All datasets of a run are written as one operation. Each file is first
//! written next to its target as a hidden `.<name>.partial` file; the targets
//! are only replaced once every write has succeeded. If any write fails the
//! partial files are removed and no existing target is touched.

use crate::dataset::{Dataset, VariableData};
use crate::engine::Engine;
use crate::errors::{Result, ReshapeError};
use crate::netcdf_io::write_dataset;
use rayon::prelude::*;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Staging path for `target`: `.<file name>.partial` in the same directory.
pub fn partial_path(target: &Path) -> Result<PathBuf> {
    let file_name = target
        .file_name()
        .ok_or_else(|| ReshapeError::InvalidInput {
            message: format!("output path '{}' has no file name", target.display()),
        })?;
    let staged = format!(".{}.partial", file_name.to_string_lossy());

    Ok(match target.parent() {
        Some(parent) => parent.join(staged),
        None => PathBuf::from(staged),
    })
}

fn remove_partials(staged: &[PathBuf]) {
    for path in staged {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                log::warn!("Could not remove partial file {}: {}", path.display(), e);
            }
        }
    }
}

/// Narrow every i64 variable to i32 for engines without a 64-bit integer type.
///
/// Datasets that need no change are borrowed as they are.
fn prepare_for_engine<'a>(dataset: &'a Dataset, path: &Path, engine: Engine) -> Result<Cow<'a, Dataset>> {
    if engine.supports_int64() {
        return Ok(Cow::Borrowed(dataset));
    }

    let mut prepared = Cow::Borrowed(dataset);
    for var in dataset.variables() {
        let VariableData::Int64(values) = var.data() else {
            continue;
        };

        if let Some(&out_of_range) = values.iter().find(|&&v| i32::try_from(v).is_err()) {
            return Err(ReshapeError::TypeMismatch {
                message: format!(
                    "variable '{}' for {} holds {}, which does not fit the 32-bit integers of the {} engine",
                    var.name(),
                    path.display(),
                    out_of_range,
                    engine
                ),
            });
        }

        let narrowed = var.with_data(values.mapv(|v| v as i32))?;
        prepared.to_mut().insert_variable(narrowed)?;
        log::debug!("Stored '{}' as i32 for the {} engine", var.name(), engine);
    }
    Ok(prepared)
}

/// Write `datasets[i]` to `paths[i]` for every `i`, overwriting existing files.
///
/// # Errors
///
/// * `TypeMismatch` if the two lists differ in length, or a dataset holds an
///   i64 value outside the i32 range for an engine without 64-bit integers
/// * the first netCDF or I/O error from writing, unmodified
pub fn save_to_disk(datasets: &[Dataset], paths: &[PathBuf], engine: Engine) -> Result<()> {
    if datasets.len() != paths.len() {
        return Err(ReshapeError::TypeMismatch {
            message: format!(
                "datasets and paths must be aligned sequences, got {} datasets and {} paths",
                datasets.len(),
                paths.len()
            ),
        });
    }

    let prepared = datasets
        .iter()
        .zip(paths)
        .map(|(dataset, path)| prepare_for_engine(dataset, path, engine))
        .collect::<Result<Vec<_>>>()?;

    let staged = paths
        .iter()
        .map(|p| partial_path(p))
        .collect::<Result<Vec<_>>>()?;

    log::info!(
        "Writing {} time-series files with the {} engine",
        datasets.len(),
        engine
    );

    let results: Vec<Result<()>> = prepared
        .par_iter()
        .zip(staged.par_iter())
        .map(|(dataset, partial)| write_dataset(dataset, partial, engine))
        .collect();

    let mut failure = None;
    for result in results {
        if let Err(e) = result {
            failure.get_or_insert(e);
        }
    }
    if let Some(e) = failure {
        remove_partials(&staged);
        return Err(e);
    }

    // Targets renamed before a failing rename stay replaced.
    for (index, (partial, target)) in staged.iter().zip(paths).enumerate() {
        if let Err(e) = fs::rename(partial, target) {
            remove_partials(&staged[index..]);
            return Err(e.into());
        }
        log::debug!("Wrote {}", target.display());
    }

    Ok(())
}
