//! Checks applied to extracted schedule rows.

use serde_json::json;
use tracing::{debug, info};

use crate::config::{OccupancyRule, ShiftguardConfig};
use crate::inference::ShiftClassifier;
use crate::input::TableView;
use crate::schema::TableLayout;

use super::finding::{sort_findings, CheckKind, Evidence, Finding, Severity};
use super::schedule::{EmployeeScheduleRow, RowExtractor, ScheduleRows};

/// Trait for schedule checks.
pub trait ScheduleCheck {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Run the check and return findings.
    fn check(&self, rows: &ScheduleRows) -> Vec<Finding>;
}

/// Flags runs of work entries longer than the allowed maximum.
///
/// A blank day or a rest day ends a run. Every day worked past the limit
/// is reported, citing the run length up to that day.
pub struct ConsecutiveWorkdayCheck {
    /// Longest allowed run.
    pub max_consecutive: usize,
}

impl ScheduleCheck for ConsecutiveWorkdayCheck {
    fn name(&self) -> &str {
        CheckKind::ConsecutiveWorkdays.rule_name()
    }

    fn check(&self, rows: &ScheduleRows) -> Vec<Finding> {
        let mut findings = Vec::new();

        for employee in rows.checkable() {
            let mut streak = 0usize;

            for (idx, entry) in employee.days.iter().enumerate() {
                if !entry.is_work() {
                    streak = 0;
                    continue;
                }
                streak = streak.saturating_add(1);
                if streak > self.max_consecutive {
                    findings.push(self.finding(rows, employee, idx + 1, streak));
                }
            }
        }

        findings
    }
}

impl ConsecutiveWorkdayCheck {
    fn finding(
        &self,
        rows: &ScheduleRows,
        employee: &EmployeeScheduleRow,
        day: usize,
        streak: usize,
    ) -> Finding {
        let label = rows
            .date(day)
            .map(|d| d.date.label.clone())
            .unwrap_or_default();

        Finding::new(
            CheckKind::ConsecutiveWorkdays,
            Severity::Violation,
            &employee.employee_id,
            format!(
                "{} consecutive workdays on day {} ({}), exceeding the limit of {}",
                streak, day, label, self.max_consecutive
            ),
        )
        .with_day(day, label)
        .with_evidence(
            Evidence::new()
                .with_observed(streak)
                .with_expected(self.max_consecutive)
                .with_source_row(employee.source_row),
        )
    }
}

/// Flags employees whose average workdays per seven days leave the band.
///
/// Only rows spanning more than one week are judged.
pub struct WeeklyRatioCheck {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl WeeklyRatioCheck {
    /// Average workdays per seven days, or `None` for a week or less.
    pub fn weekly_average(employee: &EmployeeScheduleRow) -> Option<f64> {
        let total = employee.entry_count();
        if total <= 7 {
            return None;
        }
        let weeks = total as f64 / 7.0;
        Some(employee.work_days() as f64 / weeks)
    }
}

impl ScheduleCheck for WeeklyRatioCheck {
    fn name(&self) -> &str {
        CheckKind::WeeklyWorkRatio.rule_name()
    }

    fn check(&self, rows: &ScheduleRows) -> Vec<Finding> {
        rows.checkable()
            .filter_map(|employee| {
                let avg = Self::weekly_average(employee)?;
                if avg >= self.min && avg <= self.max {
                    return None;
                }
                Some(
                    Finding::new(
                        CheckKind::WeeklyWorkRatio,
                        Severity::Warning,
                        &employee.employee_id,
                        format!(
                            "averages {:.2} workdays per week, outside [{}, {}]",
                            avg, self.min, self.max
                        ),
                    )
                    .with_evidence(
                        Evidence::new()
                            .with_observed(avg)
                            .with_expected(json!([self.min, self.max]))
                            .with_source_row(employee.source_row),
                    ),
                )
            })
            .collect()
    }
}

/// Flags dates where the head-count for a shift kind differs from the rule.
///
/// Counts every employee row, including rows too short for per-employee
/// checks.
pub struct OccupancyCheck {
    /// Rule being enforced.
    pub rule: OccupancyRule,
}

impl ScheduleCheck for OccupancyCheck {
    fn name(&self) -> &str {
        &self.rule.name
    }

    fn check(&self, rows: &ScheduleRows) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (idx, date) in rows.dates.iter().enumerate() {
            let assigned: Vec<String> = rows
                .employees
                .iter()
                .filter(|e| e.days.get(idx).and_then(|d| d.kind()) == Some(self.rule.kind))
                .map(|e| e.employee_id.clone())
                .collect();

            if assigned.len() == self.rule.expected {
                continue;
            }

            findings.push(
                Finding::new(
                    CheckKind::Occupancy,
                    Severity::Violation,
                    "",
                    format!(
                        "{} employees on {} for {}, expected {}",
                        assigned.len(),
                        self.rule.kind.label(),
                        date.date.label,
                        self.rule.expected
                    ),
                )
                .with_rule(&self.rule.name)
                .with_day(date.day, &date.date.label)
                .with_evidence(
                    Evidence::new()
                        .with_observed(assigned.len())
                        .with_expected(self.rule.expected)
                        .with_employees(assigned),
                ),
            );
        }

        findings
    }
}

/// Result of validating one schedule sheet.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Extracted rows.
    pub rows: ScheduleRows,
    /// Findings in report order.
    pub findings: Vec<Finding>,
}

/// Extracts employee rows and runs every configured check over them.
pub struct ScheduleValidator {
    extractor: RowExtractor,
    checks: Vec<Box<dyn ScheduleCheck>>,
}

impl ScheduleValidator {
    /// Create a validator with the checks named by the configuration.
    pub fn new(config: &ShiftguardConfig) -> Self {
        let policy = &config.policy;
        let mut checks: Vec<Box<dyn ScheduleCheck>> = vec![
            Box::new(ConsecutiveWorkdayCheck {
                max_consecutive: policy.max_consecutive_workdays,
            }),
            Box::new(WeeklyRatioCheck {
                min: policy.weekly_workdays_min,
                max: policy.weekly_workdays_max,
            }),
        ];
        for rule in &policy.occupancy {
            checks.push(Box::new(OccupancyCheck { rule: rule.clone() }));
        }

        let extractor = RowExtractor::new(
            ShiftClassifier::new(config.vocabulary.clone()),
            policy.clone(),
            &config.layout.name_keywords,
        );

        Self { extractor, checks }
    }

    /// Add a custom check.
    pub fn add_check(&mut self, check: Box<dyn ScheduleCheck>) {
        self.checks.push(check);
    }

    /// Extract rows and run all checks.
    pub fn validate(&self, table: &TableView, layout: &TableLayout) -> ValidationOutcome {
        let rows = self.extractor.extract(table, layout);
        let findings = self.run_checks(&rows);

        info!(
            employees = rows.employees.len(),
            skipped = rows.skipped.len(),
            findings = findings.len(),
            "schedule validated"
        );

        ValidationOutcome { rows, findings }
    }

    /// Run all checks over already extracted rows.
    pub fn run_checks(&self, rows: &ScheduleRows) -> Vec<Finding> {
        let mut all_findings = Vec::new();

        for check in &self.checks {
            let findings = check.check(rows);
            debug!(check = check.name(), found = findings.len(), "check finished");
            all_findings.extend(findings);
        }

        sort_findings(&mut all_findings);
        all_findings
    }
}

impl Default for ScheduleValidator {
    fn default() -> Self {
        Self::new(&ShiftguardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CanonicalShiftKind;
    use crate::validation::schedule::{DayEntry, ScheduleDate};
    use crate::schema::DateColumn;

    fn dates(n: usize) -> Vec<ScheduleDate> {
        (1..=n)
            .map(|day| ScheduleDate {
                column: day + 1,
                day,
                date: DateColumn::new(format!("{}日", day), None),
            })
            .collect()
    }

    fn employee(id: &str, codes: &[&str]) -> EmployeeScheduleRow {
        let classifier = ShiftClassifier::default();
        EmployeeScheduleRow {
            employee_id: id.to_string(),
            source_row: 1,
            days: codes
                .iter()
                .map(|c| {
                    if c.is_empty() {
                        DayEntry::Absent
                    } else {
                        DayEntry::Shift {
                            code: c.to_string(),
                            kind: classifier.classify(c),
                        }
                    }
                })
                .collect(),
        }
    }

    fn rows(employees: Vec<EmployeeScheduleRow>) -> ScheduleRows {
        let width = employees.iter().map(|e| e.days.len()).max().unwrap_or(0);
        ScheduleRows {
            dates: dates(width),
            employees,
            skipped: Vec::new(),
            min_entries: 5,
        }
    }

    fn repeat(code: &'static str, n: usize) -> Vec<&'static str> {
        vec![code; n]
    }

    // =========================================================================
    // Consecutive workdays
    // =========================================================================

    #[test]
    fn test_eight_days_then_rest_is_one_violation() {
        let mut codes = repeat("G", 8);
        codes.push("休");
        let findings = ConsecutiveWorkdayCheck { max_consecutive: 7 }
            .check(&rows(vec![employee("张三", &codes)]));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Violation);
        assert_eq!(findings[0].day, Some(8));
        assert_eq!(findings[0].date_label.as_deref(), Some("8日"));
        assert_eq!(findings[0].evidence.observed, Some(json!(8)));
    }

    #[test]
    fn test_seven_days_is_allowed() {
        let mut codes = repeat("G", 7);
        codes.push("休");
        let findings = ConsecutiveWorkdayCheck { max_consecutive: 7 }
            .check(&rows(vec![employee("张三", &codes)]));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_every_day_past_limit_is_reported() {
        let mut codes = repeat("G", 10);
        codes.push("休");
        let findings = ConsecutiveWorkdayCheck { max_consecutive: 7 }
            .check(&rows(vec![employee("张三", &codes)]));

        let hits: Vec<_> = findings
            .iter()
            .map(|f| (f.day, f.evidence.observed.clone()))
            .collect();
        assert_eq!(
            hits,
            vec![
                (Some(8), Some(json!(8))),
                (Some(9), Some(json!(9))),
                (Some(10), Some(json!(10))),
            ]
        );
    }

    #[test]
    fn test_separate_runs_reported_independently() {
        let mut codes = repeat("Y1030", 10);
        codes.push("休");
        codes.extend(repeat("G", 9));
        let findings = ConsecutiveWorkdayCheck { max_consecutive: 7 }
            .check(&rows(vec![employee("李四", &codes)]));

        let days: Vec<_> = findings.iter().map(|f| f.day).collect();
        assert_eq!(
            days,
            vec![Some(8), Some(9), Some(10), Some(19), Some(20)]
        );
        assert_eq!(findings[3].evidence.observed, Some(json!(8)));
    }

    #[test]
    fn test_unbounded_limit_never_fires() {
        let findings = ConsecutiveWorkdayCheck {
            max_consecutive: usize::MAX,
        }
        .check(&rows(vec![employee("张三", &repeat("G", 30))]));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_blank_day_breaks_streak() {
        let mut codes = repeat("G", 5);
        codes.push("");
        codes.extend(repeat("G", 5));
        let findings = ConsecutiveWorkdayCheck { max_consecutive: 7 }
            .check(&rows(vec![employee("王五", &codes)]));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_unclassified_counts_as_work() {
        let findings = ConsecutiveWorkdayCheck { max_consecutive: 7 }
            .check(&rows(vec![employee("赵六", &repeat("X9", 8))]));
        assert_eq!(findings.len(), 1);
    }

    // =========================================================================
    // Weekly ratio
    // =========================================================================

    fn pattern(work: usize, rest: usize) -> Vec<&'static str> {
        let mut codes = repeat("G", work);
        codes.extend(repeat("休", rest));
        codes
    }

    #[test]
    fn test_five_per_week_is_fine() {
        let findings = WeeklyRatioCheck { min: 4.0, max: 6.0 }
            .check(&rows(vec![employee("张三", &pattern(20, 8))]));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_low_ratio_warns() {
        let findings = WeeklyRatioCheck { min: 4.0, max: 6.0 }
            .check(&rows(vec![employee("张三", &pattern(10, 18))]));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("2.50"));
    }

    #[test]
    fn test_high_ratio_warns() {
        let findings = WeeklyRatioCheck { min: 4.0, max: 6.0 }
            .check(&rows(vec![employee("张三", &pattern(27, 1))]));
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_single_week_not_judged() {
        let findings = WeeklyRatioCheck { min: 4.0, max: 6.0 }
            .check(&rows(vec![employee("张三", &repeat("休", 7))]));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        // 24 of 28 days: exactly 6 per week.
        let employee = employee("张三", &pattern(24, 4));
        assert_eq!(WeeklyRatioCheck::weekly_average(&employee), Some(6.0));
        let findings = WeeklyRatioCheck { min: 4.0, max: 6.0 }.check(&rows(vec![employee]));
        assert!(findings.is_empty());
    }

    // =========================================================================
    // Occupancy
    // =========================================================================

    fn night_rule() -> OccupancyCheck {
        OccupancyCheck {
            rule: OccupancyRule {
                name: "night_shift_single_occupancy".to_string(),
                kind: CanonicalShiftKind::NightShift,
                expected: 1,
            },
        }
    }

    #[test]
    fn test_occupancy_counts() {
        let schedule = rows(vec![
            employee("张三", &["Y16", "Y16", "G", "G", "G"]),
            employee("李四", &["G", "Y16", "G", "G", "G"]),
        ]);
        let findings = night_rule().check(&schedule);

        let days: Vec<_> = findings.iter().map(|f| f.day).collect();
        assert_eq!(days, vec![Some(2), Some(3), Some(4), Some(5)]);
        assert_eq!(findings[0].evidence.observed, Some(json!(2)));
        assert_eq!(findings[0].evidence.employees, vec!["张三", "李四"]);
        assert_eq!(findings[1].evidence.observed, Some(json!(0)));
        assert!(findings.iter().all(|f| f.employee_id.is_empty()));
        assert_eq!(findings[0].rule, "night_shift_single_occupancy");
    }

    #[test]
    fn test_occupancy_includes_short_rows() {
        let schedule = rows(vec![
            employee("张三", &["G", "G", "G", "G", "G"]),
            employee("临时", &["Y16", "", "", "", ""]),
        ]);
        let findings = night_rule().check(&schedule);
        assert!(findings.iter().all(|f| f.day != Some(1)));
    }

    // =========================================================================
    // Validator
    // =========================================================================

    #[test]
    fn test_findings_sorted() {
        let mut long = repeat("Y16", 9);
        long.extend(repeat("G", 3));
        let schedule = rows(vec![
            employee("王五", &long),
            employee("张三", &pattern(2, 10)),
        ]);
        let findings = ScheduleValidator::default().run_checks(&schedule);

        let keys: Vec<_> = findings
            .iter()
            .map(|f| (f.employee_id.as_str(), f.rule.as_str()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(findings.iter().any(|f| f.check == CheckKind::Occupancy));
        assert!(findings.iter().any(|f| f.check == CheckKind::WeeklyWorkRatio));
    }

    #[test]
    fn test_short_rows_not_checked_per_employee() {
        let schedule = rows(vec![employee("临时", &["G", "G", "G", "G", "", "", "", "", ""])]);
        let validator = ScheduleValidator::default();
        let findings = validator.run_checks(&schedule);
        assert!(findings.iter().all(|f| f.check == CheckKind::Occupancy));
    }

    #[test]
    fn test_custom_check() {
        struct AlwaysInfo;
        impl ScheduleCheck for AlwaysInfo {
            fn name(&self) -> &str {
                "always"
            }
            fn check(&self, _rows: &ScheduleRows) -> Vec<Finding> {
                vec![Finding::new(
                    CheckKind::Occupancy,
                    Severity::Info,
                    "x",
                    "custom",
                )]
            }
        }

        let mut validator = ScheduleValidator::default();
        validator.add_check(Box::new(AlwaysInfo));
        let findings = validator.run_checks(&rows(Vec::new()));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "custom");
    }
}
