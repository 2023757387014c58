//! Creates a directory of synthetic monthly time-slice files.
//!
//! Usage: cargo run --example create_time_slices -- [OUTPUT_DIR] [PERIODS]
//!
//! Without OUTPUT_DIR the files go to `$HOME/.reshaper/data`.

use reshaper::synthetic::{make_netcdf_data, SyntheticOptions};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);

    let output_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => {
            let home = env::var("HOME").map_err(|_| "HOME is not set; pass an output directory")?;
            PathBuf::from(home).join(".reshaper").join("data")
        }
    };

    let mut options = SyntheticOptions::default();
    if let Some(periods) = args.next() {
        options.periods = periods.parse()?;
    }

    println!("🔨 Creating {} time slices in {}", options.periods, output_dir.display());
    let paths = make_netcdf_data(&output_dir, &options)?;

    println!("✅ Successfully created {} files", paths.len());
    println!("   📈 Series variables: sst, pressure, prec");
    println!("   🏷️  Metadata variables: meta_var, nlat, nlon");
    println!("\n🧪 Convert them with:");
    println!(
        "   cargo run -- --input-directory {} --output-directory <dir>",
        output_dir.display()
    );

    Ok(())
}
