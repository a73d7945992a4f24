//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Shiftguard: validate employee shift schedules against staffing rules
#[derive(Parser)]
#[command(name = "shiftguard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Rule-set configuration file (JSON)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

/// Options shared by commands that validate a schedule.
#[derive(Args, Clone, Debug, Default)]
pub struct ScheduleOptions {
    /// Fail when the layout could only be inferred with fallbacks
    #[arg(long)]
    pub strict: bool,

    /// Exit with status 2 when any violation is found
    #[arg(long)]
    pub fail_on_violation: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a schedule sheet
    Schedule {
        /// Path to the schedule (CSV/TSV or JSON grid)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Show per-employee work summaries
        #[arg(long)]
        employees: bool,

        #[command(flatten)]
        options: ScheduleOptions,
    },

    /// Map a rule sheet and report cross assignments
    Rules {
        /// Path to the rule sheet (CSV/TSV or JSON grid)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run schedule validation and rule mapping together
    Check {
        /// Path to the schedule
        #[arg(value_name = "SCHEDULE")]
        schedule: PathBuf,

        /// Path to the rule sheet
        #[arg(value_name = "RULES")]
        rules: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        options: ScheduleOptions,
    },

    /// Print the effective rule-set configuration as JSON
    Config,
}
