mod commands;
mod logging;
mod progress;

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::Cli;
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info};
use wordsim_core::output::{render_line, write_csv};
use wordsim_core::{AppConfig, CompareEngine, CompareResult, Error, ProgressReporter, SilentReporter};

fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();

    let args = Cli::parse();
    let _guard = logging::init_logger();

    let mut config = wordsim_core::config::load_configuration()
        .context("Error loading configuration")?;
    args.apply(&mut config);

    if args.print_config {
        println!("Configuration: {:#?}", config);
        return Ok(ExitCode::SUCCESS);
    }

    if config.root_paths.is_empty() {
        Cli::command().print_long_help()?;
        return Ok(ExitCode::from(2));
    }

    let reporter: Box<dyn ProgressReporter> = if args.quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(CliReporter::new())
    };

    let result = match CompareEngine::new(config.clone()).run(reporter.as_ref()) {
        Ok(result) => result,
        Err(err @ Error::InsufficientInput { .. }) => {
            error!("{}", err);
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err).context("Comparison failed"),
    };

    print_results(&result).context("Error writing results")?;

    if let Some(csv_path) = &args.csv {
        let rows = write_csv(result.rows(), csv_path)
            .with_context(|| format!("Error writing CSV to {}", csv_path.display()))?;
        info!("Wrote {} rows to {}", rows, csv_path.display());
    }

    print_summary(&config, &result);
    Ok(ExitCode::SUCCESS)
}

fn print_results(result: &CompareResult) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for row in result.rows() {
        writeln!(out, "{}", render_line(&row))?;
    }
    out.flush()
}

fn print_summary(config: &AppConfig, result: &CompareResult) {
    info!(
        "Discovery: {}, Analysis: {}",
        format!("{:.2}s", result.discovery_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.analysis_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files compared, {} pairs, {} files skipped",
        format!("{}", result.records.len()).cyan(),
        format!("{}", result.pair_count()).cyan(),
        format!("{}", result.stats.files_skipped).red(),
    );
    info!(
        "Threads: {} directory, {} file, {} analysis",
        config.directory_threads, config.file_threads, config.analysis_threads,
    );
}
