//! Inference of sheet layout and shift semantics.

mod classifier;
mod layout;
pub mod legend;

pub use classifier::ShiftClassifier;
pub use layout::{weekday_of, DateStrategy, HeaderStrategy, LayoutInferencer};
pub use legend::{extract_shift_legend, ShiftDefinition};
