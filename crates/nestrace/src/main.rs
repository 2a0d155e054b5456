//! compare_logs - find the first divergence between an emulator trace and nestest.log

mod cli;

use std::io::{self, Write};

use clap::Parser;
use nestrace::metrics::CliRecorder;
use nestrace::{EXIT_FAILURE, EXIT_SUCCESS, Error, terminal};
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    // Usage errors exit 1 like every other failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_FAILURE } else { EXIT_SUCCESS };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let metrics_handle = if cli.metrics {
        let handle = CliRecorder::new().install();
        if handle.is_none() {
            terminal::warning("metrics recorder already installed; --metrics ignored");
        }
        handle
    } else {
        None
    };
    nestrace::metrics::init();

    let default_level = if cli.verbose {
        "nestrace=debug"
    } else {
        "nestrace=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(default_level.parse().unwrap()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let exit_code = run(&cli);

    if let Some(handle) = metrics_handle {
        handle.print_summary();
    }

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let config = cli.compare_config();
    let result = nestrace::compare_logs(&cli.reference, &cli.candidate, &config, &mut out);
    let exit_code = match result {
        Ok(summary) => summary.exit_code(),
        Err(e @ Error::NotFound { .. }) => {
            let _ = writeln!(out, "Error: {e}");
            EXIT_FAILURE
        }
        Err(e) => {
            terminal::error(&e.to_string());
            EXIT_FAILURE
        }
    };

    let _ = out.flush();
    exit_code
}
