//! Rule-sheet structure: business lines, shift types and assigned employees.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A contiguous column interval owned by one business line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessLineRange {
    /// Business-line label from row 0.
    pub name: String,
    /// First column, inclusive.
    pub start: usize,
    /// Last column, exclusive.
    pub end: usize,
}

impl BusinessLineRange {
    /// Returns true if the column falls inside this range.
    pub fn contains(&self, col: usize) -> bool {
        (self.start..self.end).contains(&col)
    }

    /// Number of columns spanned.
    pub fn width(&self) -> usize {
        self.end - self.start
    }
}

/// A shift-type column inside a business-line range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTypeColumn {
    /// Shift-type label from row 1.
    pub name: String,
    /// Column index in the rule sheet.
    pub column: usize,
    /// Name of the owning business line.
    pub business_line: String,
}

/// Business line → shift type → employees, in sheet order.
///
/// Employee lists keep duplicates: a name written twice under one column
/// appears twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleAssignment {
    lines: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl RuleAssignment {
    pub(crate) fn ensure_line(&mut self, line: &str) -> &mut IndexMap<String, Vec<String>> {
        self.lines.entry(line.to_string()).or_default()
    }

    pub(crate) fn employees_mut(&mut self, line: &str, shift: &str) -> &mut Vec<String> {
        self.ensure_line(line).entry(shift.to_string()).or_default()
    }

    /// Business-line names in first-seen order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.keys().map(String::as_str)
    }

    /// Number of business lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Shift types defined under a business line.
    pub fn shift_types(&self, line: &str) -> Option<impl Iterator<Item = &str>> {
        self.lines
            .get(line)
            .map(|shifts| shifts.keys().map(String::as_str))
    }

    /// Employees listed under a business line and shift type.
    pub fn employees(&self, line: &str, shift: &str) -> Option<&[String]> {
        self.lines
            .get(line)
            .and_then(|shifts| shifts.get(shift))
            .map(Vec::as_slice)
    }

    /// Every (business line, employees) pair defining the named shift type.
    pub fn employees_for_shift<'a>(
        &'a self,
        shift: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        self.lines.iter().filter_map(move |(line, shifts)| {
            shifts
                .get(shift)
                .map(|employees| (line.as_str(), employees.as_slice()))
        })
    }

    /// Iterate over (line, shift, employees) triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.lines.iter().flat_map(|(line, shifts)| {
            shifts
                .iter()
                .map(move |(shift, employees)| (line.as_str(), shift.as_str(), employees.as_slice()))
        })
    }

    /// Total number of recorded assignments, duplicates included.
    pub fn total_assignments(&self) -> usize {
        self.iter().map(|(_, _, employees)| employees.len()).sum()
    }
}

/// Where one employee appears in the rule sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStat {
    /// Distinct business lines, first-seen order.
    pub business_lines: IndexSet<String>,
    /// Distinct shift types, first-seen order.
    pub shift_types: IndexSet<String>,
}

/// Everything extracted from a rule sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMap {
    /// Business-line ranges ordered by start column.
    pub ranges: Vec<BusinessLineRange>,
    /// Shift-type columns ordered by column.
    pub shift_columns: Vec<ShiftTypeColumn>,
    /// Business line → shift type → employees.
    pub assignment: RuleAssignment,
    /// Per employee, in first-seen order scanning rows then columns.
    pub employee_stats: IndexMap<String, EmployeeStat>,
}

impl RuleMap {
    /// Range owning a column, if any.
    pub fn range_for_column(&self, col: usize) -> Option<&BusinessLineRange> {
        self.ranges.iter().find(|r| r.contains(col))
    }

    /// Shift-type columns belonging to a business line.
    pub fn shift_columns_of<'a>(
        &'a self,
        line: &'a str,
    ) -> impl Iterator<Item = &'a ShiftTypeColumn> + 'a {
        self.shift_columns
            .iter()
            .filter(move |c| c.business_line == line)
    }

    /// Lookup one employee's statistics.
    pub fn employee(&self, name: &str) -> Option<&EmployeeStat> {
        self.employee_stats.get(name)
    }
}
