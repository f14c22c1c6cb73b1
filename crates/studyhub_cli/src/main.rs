//! Command-line interface entry point for StudyHub.

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use std::process::ExitCode;
use studyhub_core::config::AppConfig;
use studyhub_core::logging::init_logging;

fn main() -> ExitCode {
    let args = Cli::parse();

    let mut config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_overrides(&args.to_config_overrides());

    // File logging is best-effort for the CLI.
    if let Err(err) = init_logging(&config.logging.level, &config.log_dir()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let result = match args.command {
        Command::Config { action } => commands::config::run(action, &config, args.config.as_deref()),
        command => commands::Context::open(&config, args.now.as_deref())
            .and_then(|ctx| commands::dispatch(command, &ctx)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
