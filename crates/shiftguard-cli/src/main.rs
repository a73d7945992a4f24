//! Shiftguard CLI - schedule validation from the command line.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose));

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Schedule {
            file,
            json,
            employees,
            options,
        } => commands::schedule::run(file, json, employees, options, config),

        Commands::Rules { file, json } => {
            commands::rules::run(file, json, config).map(|_| commands::Outcome::Clean)
        }

        Commands::Check {
            schedule,
            rules,
            json,
            options,
        } => commands::check::run(schedule, rules, json, options, config),

        Commands::Config => commands::config::run(config).map(|_| commands::Outcome::Clean),
    };

    match result {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
