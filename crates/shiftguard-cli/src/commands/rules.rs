//! Rules command - map a rule sheet and list cross assignments.

use std::path::{Path, PathBuf};

use colored::Colorize;
use shiftguard::RuleReport;
use shiftguard::rules::CrossAssignment;

pub fn run(
    file: PathBuf,
    json_output: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let shiftguard = super::engine(config, false)?;

    if !json_output {
        println!(
            "{} {}",
            "Mapping rules from".cyan().bold(),
            file.display().to_string().white()
        );
        println!();
    }

    let report = shiftguard.analyze_rules_file(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Human-readable rendering of a rule report.
pub fn print_report(report: &RuleReport) {
    let map = &report.map;

    println!("{}", "Business lines".white().bold());
    for line in map.assignment.lines() {
        println!("  {} {}", line.white().bold(), column_spans(report, line).dimmed());
        if let Some(shifts) = map.assignment.shift_types(line) {
            for shift in shifts {
                let employees = map.assignment.employees(line, shift).unwrap_or_default();
                println!("    {:<16} {}", shift, employees.join(", "));
            }
        }
    }
    println!();

    print_cross("Across business lines", &report.cross.cross_business_line);
    print_cross("Across shift types", &report.cross.cross_shift_type);

    let summary = &report.summary;
    println!("{}", "Summary".white().bold());
    println!(
        "  {} business lines, {} shift types, {} employees, {} assignments",
        summary.business_lines, summary.shift_types, summary.employees, summary.total_assignments
    );
    println!(
        "  Cross assignments: {} by business line, {} by shift type",
        summary.cross_business_line.to_string().yellow(),
        summary.cross_shift_type.to_string().yellow()
    );
}

/// Column spans of every range carrying this label, 1-based.
fn column_spans(report: &RuleReport, line: &str) -> String {
    let spans: Vec<String> = report
        .map
        .ranges
        .iter()
        .filter(|range| range.name == line)
        .map(|range| format!("{}-{}", range.start + 1, range.end))
        .collect();
    format!("(columns {})", spans.join(", "))
}

fn print_cross(title: &str, entries: &[CrossAssignment]) {
    println!("{} ({})", title.white().bold(), entries.len());
    if entries.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for entry in entries {
        println!("  {:<16} {}", entry.employee, entry.values.join(", "));
    }
    println!();
}
