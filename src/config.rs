//! Resolved run configuration
//!
//! [`ReshapeConfig`] carries every value the pipeline needs. It is built once
//! at the process boundary (from [`Args`]) so library code never looks at the
//! environment or the command line itself.

use crate::builder::{OutputNaming, DEFAULT_OUTPUT_PREFIX, DEFAULT_OUTPUT_SUFFIX};
use crate::classifier::DEFAULT_TIME_DIMENSION;
use crate::cli::Args;
use crate::engine::Engine;
use crate::errors::Result;
use crate::parallel::ParallelConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReshapeConfig {
    pub engine: Engine,
    pub input_directory: PathBuf,
    pub naming: OutputNaming,
    pub time_dimension: String,
    pub parallel: ParallelConfig,
    pub verbose: bool,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            input_directory: PathBuf::new(),
            naming: OutputNaming::default(),
            time_dimension: DEFAULT_TIME_DIMENSION.to_string(),
            parallel: ParallelConfig::default(),
            verbose: false,
        }
    }
}

impl ReshapeConfig {
    /// Default options reading from `input_directory` and writing to `output_directory`
    pub fn new(input_directory: impl Into<PathBuf>, output_directory: impl Into<String>) -> Self {
        Self {
            input_directory: input_directory.into(),
            naming: OutputNaming::new(output_directory, DEFAULT_OUTPUT_PREFIX, DEFAULT_OUTPUT_SUFFIX),
            ..Self::default()
        }
    }

    /// Resolve command-line arguments.
    ///
    /// An empty output directory becomes `.`; an empty input directory is left
    /// as is and rejected by the loader.
    pub fn from_args(args: &Args) -> Result<Self> {
        let engine = args.engine.parse::<Engine>()?;
        let output_directory = if args.output_directory.is_empty() {
            ".".to_string()
        } else {
            args.output_directory.clone()
        };

        Ok(Self {
            engine,
            input_directory: PathBuf::from(&args.input_directory),
            naming: OutputNaming::new(
                output_directory,
                args.output_prefix.clone(),
                args.output_suffix.clone(),
            ),
            time_dimension: args.time_dimension.clone(),
            parallel: match args.threads {
                Some(n) => ParallelConfig::with_threads(n),
                None => ParallelConfig::all_cores(),
            },
            verbose: args.verbose,
        })
    }

    pub fn print(&self) {
        println!("⚙️  Configuration:");
        println!("   engine:           {}", self.engine);
        println!("   input directory:  {}", self.input_directory.display());
        println!("   output directory: {}", self.naming.directory);
        println!("   output prefix:    {}", self.naming.prefix);
        println!("   output suffix:    {}", self.naming.suffix);
        println!("   time dimension:   {}", self.time_dimension);
    }
}
