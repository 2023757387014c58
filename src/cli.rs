//! Defines command-line interface options using `clap` for the reshaper application.

use clap::Parser;

/// Convert a directory of NetCDF time-slice files into per-variable time-series files.
///
/// Output files are named according to the rule:
/// output_directory/output_prefix + variable_name + output_suffix
#[derive(Parser, Debug, Clone)]
#[command(name = "reshaper-run", version, about)]
pub struct Args {
    /// Engine to use when writing files (netcdf4, netcdf4-classic, netcdf3, netcdf3-64bit)
    #[arg(long, default_value = "netcdf4")]
    pub engine: String,

    /// Directory in which time-slice files are located
    #[arg(long, default_value = "")]
    pub input_directory: String,

    /// Directory in which time-series files will be saved (current directory if empty)
    #[arg(long, default_value = "")]
    pub output_directory: String,

    /// String prefix for all output files
    #[arg(long, default_value = "tseries.")]
    pub output_prefix: String,

    /// String suffix for all output files
    #[arg(long, default_value = ".nc")]
    pub output_suffix: String,

    /// Name of the time dimension used to tell series from metadata
    #[arg(long, default_value = "time")]
    pub time_dimension: String,

    /// Number of threads to use for reading and writing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
