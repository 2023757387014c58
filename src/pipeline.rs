//! Load → build → write, in sequence

use crate::builder::create_time_series;
use crate::classifier::{find_time_dependent_vars, Classification};
use crate::config::ReshapeConfig;
use crate::errors::Result;
use crate::loader::read_time_slices;
use crate::metadata::{print_classification, print_dataset_summary};
use crate::writer::save_to_disk;
use std::path::PathBuf;

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub classification: Classification,
    pub written: Vec<PathBuf>,
}

/// Run the whole conversion described by `config`. Any failure aborts the run.
pub fn run(config: &ReshapeConfig) -> Result<RunSummary> {
    let dset = read_time_slices(&config.input_directory, &config.time_dimension)?;
    log::info!(
        "Loaded {} variables over {} dimensions",
        dset.variables().len(),
        dset.dimensions().len()
    );

    let classification = find_time_dependent_vars(&dset, &config.time_dimension);
    if config.verbose {
        print_dataset_summary(&dset);
        print_classification(&classification);
    }
    if classification.has_no_series() {
        log::warn!(
            "No variable depends on '{}'; no time-series files will be written",
            config.time_dimension
        );
    }

    let (datasets, paths) = create_time_series(&config.naming, &dset, &config.time_dimension)?;
    save_to_disk(&datasets, &paths, config.engine)?;

    Ok(RunSummary {
        classification,
        written: paths,
    })
}
