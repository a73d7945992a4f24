//! Employee rows extracted from a schedule sheet.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ValidationPolicy;
use crate::inference::ShiftClassifier;
use crate::input::TableView;
use crate::schema::{CanonicalShiftKind, DateColumn, TableLayout};

/// One cell of an employee's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum DayEntry {
    /// Blank cell: no entry for that day.
    Absent,
    /// A shift code and its classification.
    Shift {
        /// Code as written.
        code: String,
        /// Canonical kind.
        kind: CanonicalShiftKind,
    },
}

impl DayEntry {
    /// Canonical kind of a present entry.
    pub fn kind(&self) -> Option<CanonicalShiftKind> {
        match self {
            DayEntry::Absent => None,
            DayEntry::Shift { kind, .. } => Some(*kind),
        }
    }

    /// Returns true for any present entry.
    pub fn is_present(&self) -> bool {
        matches!(self, DayEntry::Shift { .. })
    }

    /// Returns true for a present entry that is not rest.
    pub fn is_work(&self) -> bool {
        self.kind().is_some_and(|k| k.is_work())
    }
}

/// A date column of the sheet with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDate {
    /// Zero-based sheet column.
    pub column: usize,
    /// One-based position among date columns.
    pub day: usize,
    /// Header details.
    pub date: DateColumn,
}

/// One employee's schedule, aligned with [`ScheduleRows::dates`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeScheduleRow {
    /// Employee identifier.
    pub employee_id: String,
    /// Zero-based sheet row.
    pub source_row: usize,
    /// One entry per date column.
    pub days: Vec<DayEntry>,
}

impl EmployeeScheduleRow {
    /// Number of non-absent entries.
    pub fn entry_count(&self) -> usize {
        self.days.iter().filter(|d| d.is_present()).count()
    }

    /// Number of work entries.
    pub fn work_days(&self) -> usize {
        self.days.iter().filter(|d| d.is_work()).count()
    }

    /// Number of rest entries.
    pub fn rest_days(&self) -> usize {
        self.days
            .iter()
            .filter(|d| d.kind() == Some(CanonicalShiftKind::Rest))
            .count()
    }
}

/// Why a row was left out of per-employee checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The row is a section header or note.
    SectionHeader {
        /// Marker found in the identifier.
        marker: String,
    },
    /// The row repeats the header labels.
    RepeatedHeader,
    /// Too few entries to judge.
    InsufficientData {
        /// Non-absent entries found.
        entries: usize,
        /// Entries required.
        required: usize,
    },
}

/// A row excluded from per-employee checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Zero-based sheet row.
    pub row: usize,
    /// Identifier text of the row.
    pub label: String,
    /// Why it was skipped.
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Everything the checks need from one schedule sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRows {
    /// Date columns in sheet order.
    pub dates: Vec<ScheduleDate>,
    /// Employee rows, section headers excluded.
    pub employees: Vec<EmployeeScheduleRow>,
    /// Rows excluded from per-employee checks.
    pub skipped: Vec<SkippedRow>,
    /// Entries a row needs before per-employee checks apply.
    pub min_entries: usize,
}

impl ScheduleRows {
    /// Rows with enough entries for per-employee checks.
    pub fn checkable(&self) -> impl Iterator<Item = &EmployeeScheduleRow> + '_ {
        self.employees
            .iter()
            .filter(move |row| row.entry_count() >= self.min_entries)
    }

    /// Date for a one-based day position.
    pub fn date(&self, day: usize) -> Option<&ScheduleDate> {
        day.checked_sub(1).and_then(|idx| self.dates.get(idx))
    }
}

/// Turns sheet rows below the header into [`EmployeeScheduleRow`]s.
#[derive(Debug, Clone)]
pub struct RowExtractor {
    classifier: ShiftClassifier,
    policy: ValidationPolicy,
    name_keywords: Vec<String>,
}

impl RowExtractor {
    /// Create an extractor.
    ///
    /// `name_keywords` pick the identity column that holds employee names.
    pub fn new(
        classifier: ShiftClassifier,
        policy: ValidationPolicy,
        name_keywords: &[String],
    ) -> Self {
        Self {
            classifier,
            policy,
            name_keywords: name_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Extract employee rows from every row below the header.
    ///
    /// Blank rows are dropped silently. Section headers and repeated header
    /// rows are recorded as skipped and left out entirely. Rows with too few
    /// entries are kept for date-scoped checks but recorded as skipped.
    pub fn extract(&self, table: &TableView, layout: &TableLayout) -> ScheduleRows {
        let dates: Vec<ScheduleDate> = layout
            .date_columns()
            .enumerate()
            .map(|(pos, (column, date))| ScheduleDate {
                column,
                day: pos + 1,
                date: date.clone(),
            })
            .collect();
        let identity: Vec<usize> = layout.identity_columns().collect();
        let name_column = identity.iter().copied().find(|&col| {
            layout.identity_label(col).is_some_and(|label| {
                let lower = label.to_lowercase();
                self.name_keywords.iter().any(|k| lower.contains(k.as_str()))
            })
        });

        let mut rows = ScheduleRows {
            dates,
            min_entries: self.policy.min_entries_per_row,
            ..Default::default()
        };

        for row in layout.header_row + 1..table.row_count() {
            let days: Vec<DayEntry> = rows
                .dates
                .iter()
                .map(|d| match table.display(row, d.column) {
                    Some(code) => DayEntry::Shift {
                        kind: self.classifier.classify(&code),
                        code: code.into_owned(),
                    },
                    None => DayEntry::Absent,
                })
                .collect();

            let Some((id_column, employee_id)) =
                resolve_identifier(table, row, name_column, &identity)
            else {
                if days.iter().any(DayEntry::is_present) {
                    let employee_id = format!("row {}", row + 1);
                    self.push_employee(&mut rows, employee_id, row, days);
                }
                continue;
            };

            if let Some(marker) = self
                .policy
                .section_markers
                .iter()
                .find(|m| !m.is_empty() && employee_id.contains(m.as_str()))
            {
                debug!(row, %employee_id, "section header skipped");
                rows.skipped.push(SkippedRow {
                    row,
                    label: employee_id,
                    reason: SkipReason::SectionHeader {
                        marker: marker.clone(),
                    },
                });
                continue;
            }

            if layout.identity_label(id_column) == Some(employee_id.as_str()) {
                rows.skipped.push(SkippedRow {
                    row,
                    label: employee_id,
                    reason: SkipReason::RepeatedHeader,
                });
                continue;
            }

            self.push_employee(&mut rows, employee_id, row, days);
        }

        rows
    }

    fn push_employee(
        &self,
        rows: &mut ScheduleRows,
        employee_id: String,
        row: usize,
        days: Vec<DayEntry>,
    ) {
        let entry = EmployeeScheduleRow {
            employee_id,
            source_row: row,
            days,
        };
        let entries = entry.entry_count();
        if entries < self.policy.min_entries_per_row {
            rows.skipped.push(SkippedRow {
                row,
                label: entry.employee_id.clone(),
                reason: SkipReason::InsufficientData {
                    entries,
                    required: self.policy.min_entries_per_row,
                },
            });
        }
        rows.employees.push(entry);
    }
}

/// Employee identifier of a row: the name column if filled, otherwise the
/// first non-empty identity cell.
fn resolve_identifier(
    table: &TableView,
    row: usize,
    name_column: Option<usize>,
    identity: &[usize],
) -> Option<(usize, String)> {
    name_column
        .into_iter()
        .chain(identity.iter().copied())
        .find_map(|col| table.display(row, col).map(|text| (col, text.into_owned())))
}
