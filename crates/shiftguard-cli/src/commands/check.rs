//! Check command - run schedule validation and rule mapping together.

use std::path::{Path, PathBuf};

use colored::Colorize;
use shiftguard::PipelineOutcome;

use super::Outcome;
use crate::cli::ScheduleOptions;

pub fn run(
    schedule: PathBuf,
    rules: PathBuf,
    json_output: bool,
    options: ScheduleOptions,
    config: Option<&Path>,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let shiftguard = super::engine(config, options.strict)?;
    let report = shiftguard.check_files(&schedule, &rules);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {}",
            "Validating".cyan().bold(),
            schedule.display().to_string().white()
        );
        println!();
        match &report.schedule {
            PipelineOutcome::Completed { report } => super::schedule::print_report(report, false),
            PipelineOutcome::Failed { error } => print_failure(error),
        }

        println!();
        println!(
            "{} {}",
            "Mapping rules from".cyan().bold(),
            rules.display().to_string().white()
        );
        println!();
        match &report.rules {
            PipelineOutcome::Completed { report } => super::rules::print_report(report),
            PipelineOutcome::Failed { error } => print_failure(error),
        }
    }

    if !report.is_complete() {
        let failed: Vec<&str> = [
            report.schedule.error().map(|_| "schedule"),
            report.rules.error().map(|_| "rules"),
        ]
        .into_iter()
        .flatten()
        .collect();
        return Err(format!("{} pipeline failed", failed.join(" and ")).into());
    }

    Ok(Outcome::from_violations(
        report.has_violations(),
        options.fail_on_violation,
    ))
}

fn print_failure(error: &str) {
    println!("{} {}", "Failed:".red().bold(), error);
}
