//! reshaper: NetCDF time-slice to time-series conversion
//!
//! Climate and earth-science models commonly write one file per time step
//! holding every variable ("time slices"). Analysis tools usually want the
//! opposite: one file per variable spanning every time step ("time series").
//! This crate reads a directory of time slices, merges them along the time
//! axis, and writes one file per time-dependent variable, each carrying all
//! time-independent (metadata) variables and the original global attributes.
//!
//! ## Module Organization
//!
//! - [`dataset`]: in-memory dataset model and the [`DatasetView`] capability
//! - [`loader`]: locate and merge time-slice files
//! - [`classifier`]: split variables into time-dependent and metadata groups
//! - [`builder`]: build one dataset and output path per series
//! - [`writer`]: write all series files as one operation
//! - [`netcdf_io`]: single-file NetCDF reading and writing
//! - [`engine`]: output format selection
//! - [`pipeline`] and [`config`]: the end-to-end run used by the binary
//! - [`metadata`]: dataset summaries
//! - [`parallel`]: thread pool configuration
//! - [`synthetic`]: synthetic time-slice generation
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reshaper::prelude::*;
//! use std::path::Path;
//!
//! let dset = read_time_slices(Path::new("/data/slices"), "time").unwrap();
//! let naming = OutputNaming::new("/data/series", "tseries.", ".nc");
//! let (datasets, paths) = create_time_series(&naming, &dset, "time").unwrap();
//! save_to_disk(&datasets, &paths, Engine::NetCdf4).unwrap();
//! ```

pub mod builder;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod loader;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod pipeline;
pub mod synthetic;
pub mod writer;

pub use builder::*;
pub use classifier::*;
pub use dataset::*;
pub use engine::Engine;
pub use errors::*;
pub use loader::*;
pub use writer::*;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::builder::{create_time_series, OutputNaming};
    pub use crate::classifier::{find_time_dependent_vars, Classification, DEFAULT_TIME_DIMENSION};
    pub use crate::config::ReshapeConfig;
    pub use crate::dataset::{Dataset, DatasetView, Dimension, Variable, VariableData};
    pub use crate::engine::Engine;
    pub use crate::errors::{Result, ReshapeError};
    pub use crate::loader::read_time_slices;
    pub use crate::pipeline::{run, RunSummary};
    pub use crate::writer::save_to_disk;
}
