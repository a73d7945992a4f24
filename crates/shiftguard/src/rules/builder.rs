//! Building the business line → shift type → employee mapping.

use indexmap::IndexMap;
use tracing::{debug, info};

use super::segmentation::segment_ranges;
use crate::error::{Result, ShiftguardError};
use crate::input::TableView;
use crate::schema::{EmployeeStat, RuleAssignment, RuleMap, ShiftTypeColumn};

/// Row holding business-line labels.
pub const BUSINESS_LINE_ROW: usize = 0;
/// Row holding shift-type labels.
pub const SHIFT_TYPE_ROW: usize = 1;
/// First row listing employees.
pub const FIRST_EMPLOYEE_ROW: usize = 2;

/// Reads a rule sheet into a [`RuleMap`].
///
/// Row 0 carries sparse business-line labels, row 1 sparse shift-type labels
/// and every later row employee names under their shift-type column.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleMapBuilder;

impl RuleMapBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self
    }

    /// Build the rule map.
    ///
    /// Fails with [`ShiftguardError::MalformedRuleTable`] if row 0 holds no
    /// string labels.
    pub fn build(&self, table: &TableView) -> Result<RuleMap> {
        let ranges = segment_ranges(table, BUSINESS_LINE_ROW);
        if ranges.is_empty() {
            return Err(ShiftguardError::MalformedRuleTable(
                "row 0 contains no business-line labels".to_string(),
            ));
        }

        let mut assignment = RuleAssignment::default();
        let mut shift_columns = Vec::new();

        for range in &ranges {
            assignment.ensure_line(&range.name);
            for col in range.start..range.end {
                if let Some(name) = table.text(SHIFT_TYPE_ROW, col) {
                    shift_columns.push(ShiftTypeColumn {
                        name: name.to_string(),
                        column: col,
                        business_line: range.name.clone(),
                    });
                }
            }
            debug!(
                line = %range.name,
                start = range.start,
                end = range.end,
                "business line range"
            );
        }

        for shift in &shift_columns {
            let employees = assignment.employees_mut(&shift.business_line, &shift.name);
            for row in FIRST_EMPLOYEE_ROW..table.row_count() {
                if let Some(name) = table.text(row, shift.column) {
                    employees.push(name.to_string());
                }
            }
        }

        let mut employee_stats: IndexMap<String, EmployeeStat> = IndexMap::new();
        for row in FIRST_EMPLOYEE_ROW..table.row_count() {
            for shift in &shift_columns {
                if let Some(name) = table.text(row, shift.column) {
                    let stat = employee_stats.entry(name.to_string()).or_default();
                    stat.business_lines.insert(shift.business_line.clone());
                    stat.shift_types.insert(shift.name.clone());
                }
            }
        }

        info!(
            lines = ranges.len(),
            shift_types = shift_columns.len(),
            employees = employee_stats.len(),
            "rule table mapped"
        );

        Ok(RuleMap {
            ranges,
            shift_columns,
            assignment,
            employee_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_table() -> TableView {
        TableView::from_strings(&[
            vec!["对公", "", "个人", ""],
            vec!["夜班岗", "周末A岗", "夜班岗", "周末白班岗"],
            vec!["张三", "李四", "王五", "赵六"],
            vec!["孙七", "张三", "周八", "吴九"],
            vec!["郑十", "钱一", "冯二", "王五"],
        ])
    }

    #[test]
    fn test_two_lines_two_shifts_three_employees() {
        let map = RuleMapBuilder::new().build(&rule_table()).unwrap();

        assert_eq!(map.assignment.line_count(), 2);
        for line in ["对公", "个人"] {
            assert_eq!(map.assignment.shift_types(line).unwrap().count(), 2);
        }
        assert_eq!(
            map.assignment.employees("对公", "夜班岗").unwrap(),
            ["张三", "孙七", "郑十"]
        );
        assert_eq!(
            map.assignment.employees("个人", "周末白班岗").unwrap(),
            ["赵六", "吴九", "王五"]
        );
        for (_, _, employees) in map.assignment.iter() {
            assert_eq!(employees.len(), 3);
        }
    }

    #[test]
    fn test_shift_columns_owned_by_ranges() {
        let map = RuleMapBuilder::new().build(&rule_table()).unwrap();
        assert_eq!(map.shift_columns.len(), 4);
        for shift in &map.shift_columns {
            let range = map.range_for_column(shift.column).unwrap();
            assert_eq!(range.name, shift.business_line);
        }
        assert_eq!(map.shift_columns_of("个人").count(), 2);
    }

    #[test]
    fn test_duplicates_preserved() {
        let table = TableView::from_strings(&[
            vec!["对公"],
            vec!["夜班岗"],
            vec!["张三"],
            vec![""],
            vec!["张三"],
        ]);
        let map = RuleMapBuilder::new().build(&table).unwrap();
        assert_eq!(map.assignment.employees("对公", "夜班岗").unwrap(), ["张三", "张三"]);
        assert_eq!(map.employee_stats.len(), 1);
    }

    #[test]
    fn test_line_without_shift_types() {
        let table = TableView::from_strings(&[
            vec!["对公", "", "风险"],
            vec!["夜班岗", "", ""],
            vec!["张三", "", "李四"],
        ]);
        let map = RuleMapBuilder::new().build(&table).unwrap();
        assert_eq!(map.assignment.shift_types("风险").unwrap().count(), 0);
        assert!(map.employee("李四").is_none());
    }

    #[test]
    fn test_malformed_without_business_lines() {
        let table = TableView::from_strings(&[vec!["", ""], vec!["夜班岗", ""]]);
        let err = RuleMapBuilder::new().build(&table).unwrap_err();
        assert!(matches!(err, ShiftguardError::MalformedRuleTable(_)));
    }

    #[test]
    fn test_stats_in_scan_order() {
        let map = RuleMapBuilder::new().build(&rule_table()).unwrap();
        let names: Vec<_> = map.employee_stats.keys().map(String::as_str).collect();
        assert_eq!(&names[..5], ["张三", "李四", "王五", "赵六", "孙七"]);

        let zhang = map.employee("张三").unwrap();
        assert_eq!(zhang.business_lines.len(), 1);
        assert_eq!(zhang.shift_types.len(), 2);
    }
}
