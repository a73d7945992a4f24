//! Report types produced by the analysis pipelines.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::inference::ShiftDefinition;
use crate::input::SourceMetadata;
use crate::rules::CrossAssignmentReport;
use crate::schema::{CanonicalShiftKind, RuleMap, TableLayout};
use crate::validation::{
    DayEntry, EmployeeScheduleRow, Finding, ScheduleRows, Severity, SkippedRow, WeeklyRatioCheck,
};

/// Result of validating a schedule sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// Metadata about the source file, when loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Inferred layout.
    pub layout: TableLayout,
    /// Shift definitions found above the header.
    pub legend: Vec<ShiftDefinition>,
    /// Findings in report order.
    pub findings: Vec<Finding>,
    /// Per-employee work summaries, in sheet order.
    pub employees: Vec<EmployeeSummary>,
    /// How often each kind and code occurs.
    pub distribution: ShiftDistribution,
    /// Rows left out of per-employee checks.
    pub skipped: Vec<SkippedRow>,
    /// Summary statistics.
    pub summary: ScheduleSummary,
}

impl ScheduleReport {
    /// Returns true if any finding is a violation.
    pub fn has_violations(&self) -> bool {
        self.summary.findings_by_severity.violation > 0
    }

    /// Findings for one employee.
    pub fn findings_for<'a>(&'a self, employee_id: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings
            .iter()
            .filter(move |f| f.employee_id == employee_id)
    }
}

/// Work statistics for one employee row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Employee identifier.
    pub employee_id: String,
    /// Zero-based sheet row.
    pub source_row: usize,
    /// Non-absent entries.
    pub total_days: usize,
    /// Work entries.
    pub work_days: usize,
    /// Rest entries.
    pub rest_days: usize,
    /// Work entries over non-absent entries.
    pub work_ratio: f64,
    /// Average workdays per seven days, for rows spanning more than a week.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_weekly_workdays: Option<f64>,
}

impl EmployeeSummary {
    /// Summarize one employee row.
    pub fn from_row(row: &EmployeeScheduleRow) -> Self {
        let total_days = row.entry_count();
        let work_days = row.work_days();
        let work_ratio = if total_days == 0 {
            0.0
        } else {
            work_days as f64 / total_days as f64
        };

        Self {
            employee_id: row.employee_id.clone(),
            source_row: row.source_row,
            total_days,
            work_days,
            rest_days: row.rest_days(),
            work_ratio,
            average_weekly_workdays: WeeklyRatioCheck::weekly_average(row),
        }
    }
}

/// Occurrences of one raw shift code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCount {
    /// Code as written.
    pub code: String,
    /// Its classification.
    pub kind: CanonicalShiftKind,
    /// Number of entries.
    pub count: usize,
}

/// Counts of shift entries across all employee rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftDistribution {
    /// Entries per canonical kind, every kind listed.
    pub by_kind: IndexMap<CanonicalShiftKind, usize>,
    /// Entries per raw code, most frequent first.
    pub by_code: Vec<CodeCount>,
}

impl ShiftDistribution {
    /// Count entries of every employee row.
    pub fn from_rows(rows: &ScheduleRows) -> Self {
        let mut by_kind: IndexMap<CanonicalShiftKind, usize> =
            CanonicalShiftKind::ALL.iter().map(|&k| (k, 0)).collect();
        let mut codes: IndexMap<&str, CodeCount> = IndexMap::new();

        for entry in rows.employees.iter().flat_map(|e| &e.days) {
            let DayEntry::Shift { code, kind } = entry else {
                continue;
            };
            *by_kind.entry(*kind).or_insert(0) += 1;
            codes
                .entry(code.as_str())
                .or_insert_with(|| CodeCount {
                    code: code.clone(),
                    kind: *kind,
                    count: 0,
                })
                .count += 1;
        }

        let mut by_code: Vec<CodeCount> = codes.into_values().collect();
        by_code.sort_by(|a, b| b.count.cmp(&a.count));

        Self { by_kind, by_code }
    }

    /// Entries of one kind.
    pub fn count(&self, kind: CanonicalShiftKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Counts of findings by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub violation: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    /// Tally a list of findings.
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Violation => counts.violation += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }
}

/// Summary of a schedule report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Employee rows found.
    pub employee_rows: usize,
    /// Rows with enough entries for per-employee checks.
    pub employees_checked: usize,
    /// Date columns found.
    pub date_columns: usize,
    /// Rows left out of per-employee checks.
    pub skipped_rows: usize,
    /// Total number of findings.
    pub total_findings: usize,
    /// Findings by severity.
    pub findings_by_severity: SeverityCounts,
    /// Findings by rule name.
    pub findings_by_rule: IndexMap<String, usize>,
    /// Human-readable recommendation.
    pub recommendation: String,
}

impl ScheduleSummary {
    /// Compute the summary of a validated schedule.
    pub fn compute(rows: &ScheduleRows, findings: &[Finding], layout: &TableLayout) -> Self {
        let findings_by_severity = SeverityCounts::from_findings(findings);

        let mut findings_by_rule: IndexMap<String, usize> = IndexMap::new();
        for finding in findings {
            *findings_by_rule.entry(finding.rule.clone()).or_insert(0) += 1;
        }

        let recommendation = recommendation(&findings_by_severity, layout.is_low_confidence());

        Self {
            employee_rows: rows.employees.len(),
            employees_checked: rows.checkable().count(),
            date_columns: rows.dates.len(),
            skipped_rows: rows.skipped.len(),
            total_findings: findings.len(),
            findings_by_severity,
            findings_by_rule,
            recommendation,
        }
    }
}

fn recommendation(counts: &SeverityCounts, low_confidence: bool) -> String {
    if counts.violation > 0 {
        format!(
            "Resolve {} rule violations before publishing the schedule.",
            counts.violation
        )
    } else if counts.warning > 0 {
        format!(
            "Hard limits are met. Review {} workload warnings.",
            counts.warning
        )
    } else if low_confidence {
        "No issues found, but the layout was inferred with fallbacks. Confirm the detected columns."
            .to_string()
    } else {
        "Schedule meets all configured rules.".to_string()
    }
}

/// Result of mapping a rule sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleReport {
    /// Metadata about the source file, when loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// The mapping itself.
    pub map: RuleMap,
    /// Employees spanning several lines or shift types.
    pub cross: CrossAssignmentReport,
    /// Summary counts.
    pub summary: RuleSummary,
}

/// Summary counts of a rule report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub business_lines: usize,
    pub shift_types: usize,
    pub employees: usize,
    pub total_assignments: usize,
    pub cross_business_line: usize,
    pub cross_shift_type: usize,
}

impl RuleSummary {
    /// Compute summary counts.
    pub fn compute(map: &RuleMap, cross: &CrossAssignmentReport) -> Self {
        Self {
            business_lines: map.assignment.line_count(),
            shift_types: map.shift_columns.len(),
            employees: map.employee_stats.len(),
            total_assignments: map.assignment.total_assignments(),
            cross_business_line: cross.cross_business_line.len(),
            cross_shift_type: cross.cross_shift_type.len(),
        }
    }
}

/// Outcome of one pipeline in a combined check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome<T> {
    /// The pipeline produced a report.
    Completed { report: T },
    /// The pipeline failed.
    Failed { error: String },
}

impl<T> PipelineOutcome<T> {
    /// Wrap a pipeline result.
    pub fn from_result<E: std::fmt::Display>(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(report) => PipelineOutcome::Completed { report },
            Err(e) => PipelineOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    /// The report, if completed.
    pub fn report(&self) -> Option<&T> {
        match self {
            PipelineOutcome::Completed { report } => Some(report),
            PipelineOutcome::Failed { .. } => None,
        }
    }

    /// The error message, if failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Completed { .. } => None,
            PipelineOutcome::Failed { error } => Some(error),
        }
    }
}

/// Result of running both pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Schedule validation outcome.
    pub schedule: PipelineOutcome<ScheduleReport>,
    /// Rule mapping outcome.
    pub rules: PipelineOutcome<RuleReport>,
}

impl CheckReport {
    /// Returns true if both pipelines completed.
    pub fn is_complete(&self) -> bool {
        self.schedule.report().is_some() && self.rules.report().is_some()
    }

    /// Returns true if the schedule has any violation.
    pub fn has_violations(&self) -> bool {
        self.schedule
            .report()
            .is_some_and(ScheduleReport::has_violations)
    }
}
