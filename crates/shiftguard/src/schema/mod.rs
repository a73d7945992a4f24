//! Schema types for inferred sheet structure.

mod layout;
mod rules;
mod types;

pub use layout::{ColumnRole, DateColumn, LayoutConfidence, LayoutFallback, TableLayout};
pub use rules::{BusinessLineRange, EmployeeStat, RuleAssignment, RuleMap, ShiftTypeColumn};
pub use types::CanonicalShiftKind;
