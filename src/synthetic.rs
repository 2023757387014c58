//! Synthetic time-slice data
//!
//! Generates a directory of monthly time-slice files shaped like typical model
//! output: three gridded fields on `(time, lat, lon)` plus three metadata
//! variables that are identical in every slice. Values are deterministic so
//! generated data can be checked after a round trip.

use crate::dataset::{Dataset, Dimension, Variable};
use crate::engine::Engine;
use crate::errors::{Result, ReshapeError};
use crate::netcdf_io::write_dataset;
use chrono::{Datelike, NaiveDate};
use ndarray::{Array1, Array2, Array3};
use std::fs;
use std::path::{Path, PathBuf};

/// Names of the generated time-dependent fields, in dataset order
pub const SERIES_VARIABLES: [&str; 3] = ["sst", "pressure", "prec"];

/// Names of the generated metadata variables, in dataset order
pub const METADATA_VARIABLES: [&str; 3] = ["meta_var", "nlat", "nlon"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticOptions {
    pub start_year: i32,
    pub start_month: u32,
    /// Number of monthly slices
    pub periods: usize,
    pub nlat: usize,
    pub nlon: usize,
}

impl Default for SyntheticOptions {
    fn default() -> Self {
        Self {
            start_year: 2000,
            start_month: 1,
            periods: 24,
            nlat: 180,
            nlon: 360,
        }
    }
}

impl SyntheticOptions {
    fn start_date(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year, self.start_month, 1).ok_or_else(|| {
            ReshapeError::InvalidInput {
                message: format!("invalid start month {}-{}", self.start_year, self.start_month),
            }
        })
    }

    /// Month-end dates of every period, starting with the start month
    pub fn month_ends(&self) -> Result<Vec<NaiveDate>> {
        let start = self.start_date()?;
        let mut dates = Vec::with_capacity(self.periods);
        let (mut year, mut month) = (start.year(), start.month());

        for _ in 0..self.periods {
            let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
            let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
                .and_then(|first| first.pred_opt())
                .ok_or_else(|| ReshapeError::InvalidInput {
                    message: format!("date out of range after {}-{}", year, month),
                })?;
            dates.push(end);
            year = next_year;
            month = next_month;
        }
        Ok(dates)
    }

    fn time_units(&self) -> Result<String> {
        Ok(format!("days since {} 00:00:00", self.start_date()?.format("%Y-%m-%d")))
    }
}

/// `n` evenly spaced values from `start` to `stop`, truncated to integers
fn int_linspace(start: f64, stop: f64, n: usize) -> Array1<i64> {
    if n <= 1 {
        return Array1::from_elem(n, start as i64);
    }
    let step = (stop - start) / (n - 1) as f64;
    Array1::from_shape_fn(n, |i| (start + step * i as f64) as i64)
}

/// Build the in-memory time slice for `time_days` (days since the start date).
pub fn generate_time_slice(options: &SyntheticOptions, time_days: f64) -> Result<Dataset> {
    let (nlat, nlon) = (options.nlat, options.nlon);
    let lat = int_linspace(-90.0, 90.0, nlat);
    let lon = int_linspace(-180.0, 180.0, nlon);

    let mut dset = Dataset::new();
    dset.add_dimension(Dimension::new("time", 1))?;
    dset.add_dimension(Dimension::new("lat", nlat))?;
    dset.add_dimension(Dimension::new("lon", nlon))?;

    dset.insert_variable(
        Variable::new("time", ["time"], Array1::from_elem(1, time_days).into_dyn())?
            .with_attribute("units", options.time_units()?)
            .with_attribute("calendar", "standard"),
    )?;
    dset.insert_variable(
        Variable::new("lat", ["lat"], lat.clone().into_dyn())?.with_attribute("units", "degrees_north"),
    )?;
    dset.insert_variable(
        Variable::new("lon", ["lon"], lon.clone().into_dyn())?.with_attribute("units", "degrees_east"),
    )?;

    let season = (time_days / 365.25 * std::f64::consts::TAU).cos();
    for (k, name) in SERIES_VARIABLES.iter().enumerate() {
        let offset = k as f64;
        let field = Array3::from_shape_fn((1, nlat, nlon), |(_, j, i)| {
            let phi = (lat[j] as f64).to_radians();
            let lambda = (lon[i] as f64).to_radians();
            offset * 10.0 + phi.cos() * 5.0 + lambda.sin() + season
        });
        dset.insert_variable(Variable::new(*name, ["time", "lat", "lon"], field.into_dyn())?)?;
    }

    let meta = Array2::from_shape_fn((nlat, nlon), |(j, i)| (j * nlon + i) as i64);
    dset.insert_variable(Variable::new("meta_var", ["lat", "lon"], meta.into_dyn())?)?;
    dset.insert_variable(Variable::new(
        "nlat",
        ["lat"],
        lat.mapv(|v| v as f64 / 2.0).into_dyn(),
    )?)?;
    dset.insert_variable(Variable::new(
        "nlon",
        ["lon"],
        lon.mapv(|v| v as f64 / 2.0).into_dyn(),
    )?)?;

    dset.set_attribute("created on", "2010-10-10");
    dset.set_attribute("created by", "foo");
    dset.set_attribute("experiment_name", "bar");

    Ok(dset)
}

/// Write `options.periods` time-slice files `tslice{index}.nc` into `output_dir`,
/// creating it if needed. Returns the written paths in time order.
pub fn make_netcdf_data(output_dir: &Path, options: &SyntheticOptions) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let start = options.start_date()?;
    let mut paths = Vec::with_capacity(options.periods);

    for (index, date) in options.month_ends()?.into_iter().enumerate() {
        let time_days = (date - start).num_days() as f64;
        let dset = generate_time_slice(options, time_days)?;
        let path = output_dir.join(format!("tslice{}.nc", index));
        write_dataset(&dset, &path, Engine::NetCdf4)?;
        paths.push(path);
    }

    println!(
        "******** The generated data location is : {} ************",
        output_dir.display()
    );

    Ok(paths)
}
