//! Schedule command - validate one schedule sheet.

use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use shiftguard::validation::SkipReason;
use shiftguard::{CanonicalShiftKind, ScheduleReport, Severity};

use super::Outcome;
use crate::cli::ScheduleOptions;

pub fn run(
    file: PathBuf,
    json_output: bool,
    show_employees: bool,
    options: ScheduleOptions,
    config: Option<&Path>,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let shiftguard = super::engine(config, options.strict)?;

    if !json_output {
        println!(
            "{} {}",
            "Validating".cyan().bold(),
            file.display().to_string().white()
        );
        println!();
    }

    let report = shiftguard.analyze_schedule_file(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, show_employees);
    }

    Ok(Outcome::from_violations(
        report.has_violations(),
        options.fail_on_violation,
    ))
}

/// Human-readable rendering of a schedule report.
pub fn print_report(report: &ScheduleReport, show_employees: bool) {
    print_layout(report);
    print_skipped(report);
    print_distribution(report);

    if show_employees {
        print_employees(report);
    }

    print_findings(report);
    print_summary(report);
}

fn print_layout(report: &ScheduleReport) {
    let layout = &report.layout;
    let identity: Vec<&str> = layout
        .identity_columns()
        .filter_map(|col| layout.identity_label(col))
        .collect();

    println!("{}", "Layout".white().bold());
    println!("  Header row:   {}", layout.header_row + 1);
    println!("  Identity:     {}", identity.join(", "));
    println!("  Date columns: {}", layout.date_column_count());

    let weekend: Vec<&str> = layout
        .date_columns()
        .filter(|(_, date)| date.is_rest_eligible_day)
        .map(|(_, date)| date.label.as_str())
        .collect();
    if !weekend.is_empty() {
        println!("  Weekend days: {}", weekend.join(" "));
    }

    if layout.is_low_confidence() {
        println!("  Confidence:   {}", "low".yellow().bold());
        for fallback in layout.fallbacks() {
            println!("    {} {}", "•".yellow(), fallback.description());
        }
    } else {
        println!("  Confidence:   {}", "high".green());
    }

    if !report.legend.is_empty() {
        println!();
        println!("{}", "Shift legend".white().bold());
        for def in &report.legend {
            let overnight = if def.overnight { " (+1)" } else { "" };
            println!("  {:<8} {}-{}{}", def.code, def.start, def.end, overnight);
        }
    }
    println!();
}

fn print_skipped(report: &ScheduleReport) {
    if report.skipped.is_empty() {
        return;
    }

    println!("{} ({})", "Skipped rows".white().bold(), report.skipped.len());
    for skipped in &report.skipped {
        let reason = match &skipped.reason {
            SkipReason::SectionHeader { marker } => format!("section marker '{}'", marker),
            SkipReason::RepeatedHeader => "repeated header".to_string(),
            SkipReason::InsufficientData { entries, required } => {
                format!("{} of {} required entries", entries, required)
            }
        };
        println!(
            "  row {:>4}  {:<16} {}",
            skipped.row + 1,
            skipped.label,
            reason.dimmed()
        );
    }
    println!();
}

fn print_distribution(report: &ScheduleReport) {
    println!("{}", "Shift distribution".white().bold());
    for (kind, count) in &report.distribution.by_kind {
        if *count == 0 {
            continue;
        }
        let label = format!("{:<22}", kind.label());
        let label = if *kind == CanonicalShiftKind::Unclassified {
            label.yellow()
        } else {
            label.normal()
        };
        println!("  {} {}", label, count);
    }

    let unclassified: Vec<&str> = report
        .distribution
        .by_code
        .iter()
        .filter(|c| c.kind == CanonicalShiftKind::Unclassified)
        .map(|c| c.code.as_str())
        .collect();
    if !unclassified.is_empty() {
        println!(
            "  {} {}",
            "Unrecognised codes:".yellow(),
            unclassified.join(", ")
        );
    }
    println!();
}

fn print_employees(report: &ScheduleReport) {
    println!("{}", "Employees".white().bold());
    println!(
        "  {:<16} {:>5} {:>5} {:>5} {:>7}",
        "ID".dimmed(),
        "Days".dimmed(),
        "Work".dimmed(),
        "Rest".dimmed(),
        "Weekly".dimmed()
    );
    for employee in &report.employees {
        let weekly = employee
            .average_weekly_workdays
            .map(|w| format!("{:.2}", w))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<16} {:>5} {:>5} {:>5} {:>7}",
            employee.employee_id,
            employee.total_days,
            employee.work_days,
            employee.rest_days,
            weekly
        );
    }
    println!();
}

fn print_findings(report: &ScheduleReport) {
    if report.findings.is_empty() {
        println!("{}", "No findings.".green());
        println!();
        return;
    }

    println!("{} ({})", "Findings".white().bold(), report.findings.len());
    for finding in &report.findings {
        let who = if finding.employee_id.is_empty() {
            "(all)".dimmed().to_string()
        } else {
            finding.employee_id.clone()
        };
        let when = finding
            .date_label
            .as_deref()
            .map(|label| format!(" [{}]", label))
            .unwrap_or_default();

        println!(
            "  {} {} {}{}: {}",
            severity_tag(finding.severity),
            who,
            finding.rule.dimmed(),
            when,
            finding.message
        );
    }
    println!();
}

fn print_summary(report: &ScheduleReport) {
    let summary = &report.summary;
    let counts = &summary.findings_by_severity;

    println!("{}", "Summary".white().bold());
    println!(
        "  Employees: {} rows, {} checked over {} days",
        summary.employee_rows, summary.employees_checked, summary.date_columns
    );
    println!(
        "  Findings:  {} violation{}, {} warning{}, {} info",
        counts.violation.to_string().red(),
        plural(counts.violation),
        counts.warning.to_string().yellow(),
        plural(counts.warning),
        counts.info.to_string().blue()
    );
    for (rule, count) in &summary.findings_by_rule {
        println!("    {:<32} {}", rule.dimmed(), count);
    }

    println!();
    let recommendation = if counts.violation > 0 {
        summary.recommendation.red().bold()
    } else if counts.warning > 0 || report.layout.is_low_confidence() {
        summary.recommendation.yellow()
    } else {
        summary.recommendation.green()
    };
    println!("{}", recommendation);
}

fn severity_tag(severity: Severity) -> ColoredString {
    let tag = format!("{:<9}", severity.label().to_uppercase());
    match severity {
        Severity::Violation => tag.red().bold(),
        Severity::Warning => tag.yellow(),
        Severity::Info => tag.blue(),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn schedule_file(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(0), "s");
        assert_eq!(plural(3), "s");
    }

    #[test]
    fn test_run_fails_on_violation_when_asked() {
        let file = schedule_file(&[
            "姓名,1日,2日,3日,4日,5日,6日,7日,8日,9日",
            "张三,G,G,G,G,G,G,G,G,休",
            "李四,Y16,休,Y16,休,Y16,休,Y16,休,Y16",
        ]);

        let options = ScheduleOptions {
            strict: false,
            fail_on_violation: true,
        };
        let outcome = run(file.path().to_path_buf(), true, false, options, None).unwrap();
        assert_eq!(outcome, Outcome::Violations);
    }

    #[test]
    fn test_run_clean_without_flag() {
        let file = schedule_file(&[
            "姓名,1日,2日,3日,4日,5日,6日,7日,8日,9日",
            "张三,G,G,G,G,G,G,G,G,休",
        ]);

        let outcome = run(
            file.path().to_path_buf(),
            true,
            false,
            ScheduleOptions::default(),
            None,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Clean);
    }

    #[test]
    fn test_run_missing_file_is_error() {
        let result = run(
            PathBuf::from("/nonexistent/roster.csv"),
            true,
            false,
            ScheduleOptions::default(),
            None,
        );
        assert!(result.is_err());
    }
}
