//! Core type definitions for shift classification.

use serde::{Deserialize, Serialize};

/// Normalized category a raw shift code maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalShiftKind {
    /// Plain daytime workday shift.
    NormalWorkday,
    /// Overnight duty.
    NightShift,
    /// Weekend post.
    WeekendShift,
    /// Named special shift on a workday.
    WorkdaySpecialShift,
    /// Explicit rest marker.
    Rest,
    /// Non-empty code no rule recognised.
    Unclassified,
}

impl CanonicalShiftKind {
    /// All kinds in declaration order.
    pub const ALL: [CanonicalShiftKind; 6] = [
        CanonicalShiftKind::NormalWorkday,
        CanonicalShiftKind::NightShift,
        CanonicalShiftKind::WeekendShift,
        CanonicalShiftKind::WorkdaySpecialShift,
        CanonicalShiftKind::Rest,
        CanonicalShiftKind::Unclassified,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalShiftKind::NormalWorkday => "Normal Workday",
            CanonicalShiftKind::NightShift => "Night Shift",
            CanonicalShiftKind::WeekendShift => "Weekend Shift",
            CanonicalShiftKind::WorkdaySpecialShift => "Workday Special Shift",
            CanonicalShiftKind::Rest => "Rest",
            CanonicalShiftKind::Unclassified => "Unclassified",
        }
    }

    /// Returns true for every kind that counts as a day worked.
    ///
    /// Unclassified codes count as work: only an explicit rest marker is rest.
    pub fn is_work(&self) -> bool {
        !matches!(self, CanonicalShiftKind::Rest)
    }
}

impl std::fmt::Display for CanonicalShiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
