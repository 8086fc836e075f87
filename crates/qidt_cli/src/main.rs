//! CLI entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `qidt_core` linkage.
//! - Run IR smoothing and the result-table export without the UI.

use clap::{Parser, Subcommand};
use qidt_core::spectrum::{self, DEFAULT_SIGMA};
use qidt_core::{open_result_service, table, AppConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "QIDT notebook core utilities")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print core ping and version (default).
    Smoke,
    /// Smooth a headerless `wavenumber,intensity` CSV into a sampled curve.
    Ir {
        /// Input peak list.
        #[arg(value_name = "PATH")]
        input: PathBuf,
        /// Gaussian width σ in cm⁻¹.
        #[arg(short, long, default_value_t = DEFAULT_SIGMA)]
        sigma: f64,
        /// Output CSV; stdout when omitted.
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Export every stored structure result as CSV.
    Export {
        /// Data directory holding `results/`.
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,
        /// Output CSV; stdout when omitted.
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command.unwrap_or(Commands::Smoke)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Smoke => {
            println!("qidt_core ping={}", qidt_core::ping());
            println!("qidt_core version={}", qidt_core::core_version());
            Ok(())
        }
        Commands::Ir { input, sigma, out } => {
            let data =
                fs::read(&input).map_err(|err| format!("cannot read `{}`: {err}", input.display()))?;
            let csv = spectrum::smooth_csv(&data, sigma)
                .and_then(|curve| curve.to_csv())
                .map_err(|err| err.to_string())?;
            emit(&csv, out.as_deref())
        }
        Commands::Export { data_dir, out } => {
            let config = AppConfig::with_data_dir(data_dir);
            let results = open_result_service(&config)
                .list_results()
                .map_err(|err| err.to_string())?;
            let csv = table::export_csv(&results).map_err(|err| err.to_string())?;
            emit(&csv, out.as_deref())
        }
    }
}

fn emit(bytes: &[u8], out: Option<&Path>) -> Result<(), String> {
    match out {
        Some(path) => fs::write(path, bytes)
            .map_err(|err| format!("cannot write `{}`: {err}", path.display())),
        None => {
            print!("{}", String::from_utf8_lossy(bytes));
            Ok(())
        }
    }
}
