//! Entry point for reshaper-run.
//! Parses the command line, resolves the configuration and runs the conversion.

use clap::Parser;
use reshaper::cli::Args;
use reshaper::config::ReshapeConfig;
use reshaper::parallel::get_parallel_info;
use reshaper::pipeline::run;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = try_main(&args) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn try_main(args: &Args) -> reshaper::Result<()> {
    let config = ReshapeConfig::from_args(args)?;
    config.print();

    config.parallel.setup_global_pool()?;
    if config.verbose {
        get_parallel_info().print_info();
    }

    let summary = run(&config)?;

    if summary.written.is_empty() {
        println!("⚠ No time-dependent variables found; nothing written");
    } else {
        println!("✅ Wrote {} time-series files:", summary.written.len());
        for path in &summary.written {
            println!("   {}", path.display());
        }
    }

    Ok(())
}
