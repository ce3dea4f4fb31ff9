use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{error::ErrorKind, CommandFactory, Parser};

use shark::cli::{self, Cli, Context};
use shark::core::config::AppConfig;
use shark::core::telemetry::init_logging;
use shark::services::prompt;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    let config = AppConfig::from_env(cli.verbose);
    init_logging(config.verbose);
    tracing::debug!(?config, "starting");

    match execute(cli, &config) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut prompt = prompt::stdio();
    let mut ctx = Context {
        config,
        out: &mut out,
        prompt: &mut prompt,
    };

    let result = cli::run(cli, &mut ctx);
    out.flush()
        .map_err(|e| anyhow!("failed to write output: {e}"))?;
    match result? {
        Some(outcome) => Ok(outcome.into()),
        None => {
            Cli::command().print_help()?;
            Ok(ExitCode::FAILURE)
        }
    }
}
