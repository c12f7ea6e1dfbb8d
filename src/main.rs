mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Outcome};
use std::env;
use std::process::ExitCode;
use threadsweep::config::API_KEY_ENV;
use threadsweep::debug;

fn main() -> ExitCode {
    debug::init();
    let cli = Cli::parse();

    if cli.init_config {
        return match commands::run_init(&cli.config_path(), cli.force) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Error: {e:#}");
                ExitCode::FAILURE
            }
        };
    }

    let settings = match cli
        .load_config()
        .and_then(|config| cli.resolve(&config, env::var(API_KEY_ENV).ok()))
    {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Error: {e:#}");
            eprintln!();
            eprintln!("Run with --help for more information");
            return ExitCode::FAILURE;
        }
    };

    if let Some(key) = &settings.api_key {
        if let Some(warning) = cli::api_key_warning(key, &settings.api_key_prefix) {
            eprintln!("{warning}");
        }
    }

    let outcome = Outcome::from_result(&commands::run_clean(&settings));
    match (&outcome, outcome.message()) {
        (Outcome::Failed(_), Some(message)) => eprintln!("{message}"),
        (_, Some(message)) => println!("{message}"),
        (_, None) => {}
    }
    outcome.exit_code()
}
