//! Shiftguard: employee schedule validation for spreadsheet-based rosters.
//!
//! Shiftguard reads two kinds of sheets exported from spreadsheets:
//!
//! - a **schedule**, one row per employee and one column per day, whose header
//!   row sits somewhere below titles, legends and notes;
//! - a **rule sheet** mapping business lines to shift types to the employees
//!   eligible for them.
//!
//! # Core Principles
//!
//! - **Layout is inferred**: header rows and column roles are found by ordered
//!   heuristics, and every fallback lowers the reported confidence
//! - **Rules are data**: shift vocabularies, keywords and limits come from a
//!   versioned [`ShiftguardConfig`]
//! - **Deterministic output**: findings are ordered by employee, rule and day
//!
//! # Example
//!
//! ```no_run
//! use shiftguard::Shiftguard;
//!
//! let shiftguard = Shiftguard::new().unwrap();
//! let report = shiftguard.analyze_schedule_file("schedule.csv").unwrap();
//!
//! println!("Employees: {}", report.summary.employee_rows);
//! for finding in &report.findings {
//!     println!("{} {}: {}", finding.severity.label(), finding.employee_id, finding.message);
//! }
//! ```

pub mod config;
pub mod error;
pub mod inference;
pub mod input;
pub mod report;
pub mod rules;
pub mod schema;
pub mod validation;

mod shiftguard;

pub use crate::shiftguard::Shiftguard;
pub use config::{ShiftguardConfig, ValidationPolicy};
pub use error::{Result, ShiftguardError};
pub use input::{CellValue, SourceMetadata, TableView};
pub use report::{CheckReport, PipelineOutcome, RuleReport, ScheduleReport};
pub use schema::{CanonicalShiftKind, RuleMap, TableLayout};
pub use validation::{Finding, Severity};
