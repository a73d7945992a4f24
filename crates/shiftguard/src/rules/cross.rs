//! Employees assigned across several business lines or shift types.

use serde::{Deserialize, Serialize};

use crate::schema::RuleMap;

/// One employee and the set of lines or shift types they span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossAssignment {
    /// Employee name.
    pub employee: String,
    /// Distinct business lines or shift types, first-seen order.
    pub values: Vec<String>,
}

/// Result of cross-assignment analysis. Informational, not a violation list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossAssignmentReport {
    /// Employees under more than one business line.
    pub cross_business_line: Vec<CrossAssignment>,
    /// Employees under more than one shift type.
    pub cross_shift_type: Vec<CrossAssignment>,
}

/// Detects employees appearing under several business lines or shift types.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossAssignmentAnalyzer;

impl CrossAssignmentAnalyzer {
    /// Analyze a rule map. Output follows first-seen order of employees.
    pub fn analyze(map: &RuleMap) -> CrossAssignmentReport {
        let mut report = CrossAssignmentReport::default();

        for (employee, stat) in &map.employee_stats {
            if stat.business_lines.len() > 1 {
                report.cross_business_line.push(CrossAssignment {
                    employee: employee.clone(),
                    values: stat.business_lines.iter().cloned().collect(),
                });
            }
            if stat.shift_types.len() > 1 {
                report.cross_shift_type.push(CrossAssignment {
                    employee: employee.clone(),
                    values: stat.shift_types.iter().cloned().collect(),
                });
            }
        }

        report
    }
}
