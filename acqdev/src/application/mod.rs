pub mod handlers;

use crate::presentation::cli::Cli;
use acq_core::error::AcqError;
use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub const EXIT_USAGE: u8 = 1;
pub const EXIT_BAD_EXTENSION: u8 = 2;
pub const EXIT_FAILED: u8 = 3;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };
    init_tracing(cli.verbose);

    let args = handlers::SalvageArgs {
        source: cli.source,
        dest: cli.dest,
        layout: cli.layout,
        chunk_records: cli.chunk_records,
        report: cli.report,
        deterministic: cli.deterministic,
        dry_run: cli.dry_run,
        in_memory: cli.in_memory,
        #[cfg(feature = "plot")]
        plot: cli.plot,
    };

    match handlers::handle_salvage(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ AcqError::InvalidSourceExtension(_)) => {
            eprintln!("ERROR: {e}. Exit.");
            ExitCode::from(EXIT_BAD_EXTENSION)
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::from(EXIT_FAILED)
        }
    }
}
