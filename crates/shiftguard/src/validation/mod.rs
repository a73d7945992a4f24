//! Schedule validation: row extraction and rule checks.

mod finding;
mod schedule;
mod validators;

pub use finding::{sort_findings, CheckKind, Evidence, Finding, Severity};
pub use schedule::{
    DayEntry, EmployeeScheduleRow, RowExtractor, ScheduleDate, ScheduleRows, SkipReason,
    SkippedRow,
};
pub use validators::{
    ConsecutiveWorkdayCheck, OccupancyCheck, ScheduleCheck, ScheduleValidator, ValidationOutcome,
    WeeklyRatioCheck,
};
