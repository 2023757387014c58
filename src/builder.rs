//! Time-series dataset construction
//!
//! For every time-dependent variable, builds a dataset holding that variable,
//! every metadata variable and the source global attributes, and computes the
//! file it will be written to.

use crate::classifier::find_time_dependent_vars;
use crate::dataset::Dataset;
use crate::errors::Result;
use std::path::PathBuf;

/// Default prefix for time-series file names
pub const DEFAULT_OUTPUT_PREFIX: &str = "tseries.";

/// Default suffix for time-series file names
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".nc";

/// How output files are named: `{directory}/{prefix}{variable}{suffix}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    pub directory: String,
    pub prefix: String,
    pub suffix: String,
}

impl OutputNaming {
    pub fn new(
        directory: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Plain string concatenation; no normalisation of separators.
    pub fn path_for(&self, var_name: &str) -> String {
        format!(
            "{}/{}{}{}",
            self.directory, self.prefix, var_name, self.suffix
        )
    }
}

impl Default for OutputNaming {
    fn default() -> Self {
        Self::new("", DEFAULT_OUTPUT_PREFIX, DEFAULT_OUTPUT_SUFFIX)
    }
}

/// Build one dataset per time-dependent variable of `dset`.
///
/// Returns the datasets and their target paths, index-aligned and in
/// classifier order. A dataset without time-dependent variables yields two
/// empty lists.
pub fn create_time_series(
    naming: &OutputNaming,
    dset: &Dataset,
    time_dim: &str,
) -> Result<(Vec<Dataset>, Vec<PathBuf>)> {
    let classification = find_time_dependent_vars(dset, time_dim);
    let mut datasets = Vec::with_capacity(classification.time_dependent.len());
    let mut paths = Vec::with_capacity(classification.time_dependent.len());

    for vname in &classification.time_dependent {
        let mut var_dset = Dataset::new();
        var_dset.insert_from(dset, vname)?;

        for mvar in &classification.time_independent {
            var_dset.insert_from(dset, mvar)?;
        }

        var_dset.set_attributes(dset.attributes().to_vec());

        let fpath = naming.path_for(vname);
        log::debug!("Prepared series '{}' -> {}", vname, fpath);
        datasets.push(var_dset);
        paths.push(PathBuf::from(fpath));
    }

    println!(
        "*** The generated time series files are located in : {} ***",
        naming.directory
    );

    Ok((datasets, paths))
}
