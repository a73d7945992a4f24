//! Finding types reported by schedule checks.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which check produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Too many workdays in a row.
    ConsecutiveWorkdays,
    /// Average weekly workdays outside the allowed band.
    WeeklyWorkRatio,
    /// Head-count for a shift kind on one date differs from expectation.
    Occupancy,
}

impl CheckKind {
    /// Default rule name for findings of this kind.
    pub fn rule_name(&self) -> &'static str {
        match self {
            CheckKind::ConsecutiveWorkdays => "consecutive_workdays",
            CheckKind::WeeklyWorkRatio => "weekly_work_ratio",
            CheckKind::Occupancy => "occupancy",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::ConsecutiveWorkdays => "Consecutive Workdays",
            CheckKind::WeeklyWorkRatio => "Weekly Work Ratio",
            CheckKind::Occupancy => "Occupancy",
        }
    }
}

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Should be reviewed.
    Warning,
    /// Breaks a scheduling rule.
    Violation,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Violation => "Violation",
        }
    }
}

/// Values backing a finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// What was measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<Value>,
    /// What the rule expects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    /// Zero-based sheet row of the employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_row: Option<usize>,
    /// Employees involved, for date-scoped checks.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub employees: Vec<String>,
}

impl Evidence {
    /// Create empty evidence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the observed value.
    pub fn with_observed(mut self, value: impl Into<Value>) -> Self {
        self.observed = Some(value.into());
        self
    }

    /// Set the expected value.
    pub fn with_expected(mut self, value: impl Into<Value>) -> Self {
        self.expected = Some(value.into());
        self
    }

    /// Set the source row.
    pub fn with_source_row(mut self, row: usize) -> Self {
        self.source_row = Some(row);
        self
    }

    /// Set involved employees.
    pub fn with_employees(mut self, employees: Vec<String>) -> Self {
        self.employees = employees;
        self
    }
}

/// One reported rule breach or warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Employee the finding is about; empty for date-scoped findings.
    pub employee_id: String,
    /// Rule name.
    pub rule: String,
    /// Check that produced it.
    pub check: CheckKind,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// One-based position among date columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<usize>,
    /// Header label of that date column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_label: Option<String>,
    /// Supporting evidence.
    pub evidence: Evidence,
}

impl Finding {
    /// Create a finding under the check's default rule name.
    pub fn new(
        check: CheckKind,
        severity: Severity,
        employee_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            rule: check.rule_name().to_string(),
            check,
            severity,
            message: message.into(),
            day: None,
            date_label: None,
            evidence: Evidence::new(),
        }
    }

    /// Override the rule name.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = rule.into();
        self
    }

    /// Attach the date the finding refers to.
    pub fn with_day(mut self, day: usize, label: impl Into<String>) -> Self {
        self.day = Some(day);
        self.date_label = Some(label.into());
        self
    }

    /// Set the evidence.
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }

    /// Report order: employee, rule name, then day.
    pub fn report_order(&self, other: &Self) -> Ordering {
        self.employee_id
            .cmp(&other.employee_id)
            .then_with(|| self.rule.cmp(&other.rule))
            .then_with(|| self.day.cmp(&other.day))
    }
}

/// Sort findings into report order; ties keep their relative order.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(Finding::report_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_finding() {
        let finding = Finding::new(
            CheckKind::ConsecutiveWorkdays,
            Severity::Violation,
            "张三",
            "worked 8 consecutive days",
        )
        .with_day(8, "周一")
        .with_evidence(Evidence::new().with_observed(8).with_expected(7));

        assert_eq!(finding.rule, "consecutive_workdays");
        assert_eq!(finding.day, Some(8));
        assert_eq!(finding.evidence.observed, Some(Value::from(8)));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Violation);
    }

    #[test]
    fn test_sort_order() {
        let mut findings = vec![
            Finding::new(CheckKind::WeeklyWorkRatio, Severity::Warning, "b", "x"),
            Finding::new(CheckKind::ConsecutiveWorkdays, Severity::Violation, "b", "y")
                .with_day(9, "d9"),
            Finding::new(CheckKind::ConsecutiveWorkdays, Severity::Violation, "b", "z")
                .with_day(3, "d3"),
            Finding::new(CheckKind::Occupancy, Severity::Violation, "", "w").with_day(1, "d1"),
            Finding::new(CheckKind::WeeklyWorkRatio, Severity::Warning, "a", "v"),
        ];
        sort_findings(&mut findings);

        let order: Vec<_> = findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(order, vec!["w", "v", "z", "y", "x"]);
    }
}
