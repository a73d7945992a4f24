//! Rule-sheet mapping and cross-assignment analysis.

mod builder;
mod cross;
mod segmentation;

pub use builder::{BUSINESS_LINE_ROW, FIRST_EMPLOYEE_ROW, RuleMapBuilder, SHIFT_TYPE_ROW};
pub use cross::{CrossAssignment, CrossAssignmentAnalyzer, CrossAssignmentReport};
pub use segmentation::segment_ranges;
