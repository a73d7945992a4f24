//! Inferred layout of a schedule sheet.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftguardError};

/// A column holding one scheduled day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumn {
    /// Header text as written in the sheet.
    pub label: String,
    /// Weekday, when the label names one or is a parseable date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<Weekday>,
    /// Saturday or Sunday. Reporting context only.
    pub is_rest_eligible_day: bool,
}

impl DateColumn {
    /// Create a date column; rest eligibility follows the weekday.
    pub fn new(label: impl Into<String>, weekday: Option<Weekday>) -> Self {
        Self {
            label: label.into(),
            weekday,
            is_rest_eligible_day: matches!(weekday, Some(Weekday::Sat | Weekday::Sun)),
        }
    }
}

/// Role of a column in a schedule sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ColumnRole {
    /// Employee or department identifier.
    Identity {
        /// Header text.
        label: String,
    },
    /// One scheduled day.
    Date(DateColumn),
    /// Neither identity nor date.
    Ignored,
}

/// A heuristic stage that failed and was replaced by a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutFallback {
    /// Header row found from shift codes in the row below, not keywords.
    HeaderFromShiftCodes,
    /// Date columns found from cell contents, not header text.
    DatesFromContent,
    /// Every non-identity column was taken as a date column.
    AllNonIdentityAsDates,
    /// No identity keyword matched; the first column was taken as identity.
    FirstColumnAsIdentity,
}

impl LayoutFallback {
    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            LayoutFallback::HeaderFromShiftCodes => {
                "header row located from shift codes in the following row"
            }
            LayoutFallback::DatesFromContent => "date columns detected from cell contents",
            LayoutFallback::AllNonIdentityAsDates => {
                "all non-identity columns treated as date columns"
            }
            LayoutFallback::FirstColumnAsIdentity => "first column assumed to identify employees",
        }
    }
}

/// How much to trust an inferred layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum LayoutConfidence {
    /// Primary heuristics succeeded.
    High,
    /// At least one fallback was used.
    Low { fallbacks: Vec<LayoutFallback> },
}

/// Header row and per-column roles of a schedule sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableLayout {
    /// Zero-based index of the header row.
    pub header_row: usize,
    /// One role per column, indexed by column.
    pub columns: Vec<ColumnRole>,
    /// Confidence tag carried from the strategies that produced it.
    pub confidence: LayoutConfidence,
}

impl TableLayout {
    /// Indices of identity columns.
    pub fn identity_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, role)| matches!(role, ColumnRole::Identity { .. }))
            .map(|(idx, _)| idx)
    }

    /// Date columns with their indices, in column order.
    pub fn date_columns(&self) -> impl Iterator<Item = (usize, &DateColumn)> + '_ {
        self.columns.iter().enumerate().filter_map(|(idx, role)| match role {
            ColumnRole::Date(date) => Some((idx, date)),
            _ => None,
        })
    }

    /// Number of date columns.
    pub fn date_column_count(&self) -> usize {
        self.date_columns().count()
    }

    /// Header text of an identity column.
    pub fn identity_label(&self, col: usize) -> Option<&str> {
        match self.columns.get(col) {
            Some(ColumnRole::Identity { label }) => Some(label),
            _ => None,
        }
    }

    /// Returns true if any fallback was used.
    pub fn is_low_confidence(&self) -> bool {
        matches!(self.confidence, LayoutConfidence::Low { .. })
    }

    /// Fallbacks used, empty for a high-confidence layout.
    pub fn fallbacks(&self) -> &[LayoutFallback] {
        match &self.confidence {
            LayoutConfidence::High => &[],
            LayoutConfidence::Low { fallbacks } => fallbacks,
        }
    }

    /// Reject low-confidence layouts for callers that cannot accept guesses.
    pub fn require_confident(&self) -> Result<&Self> {
        match &self.confidence {
            LayoutConfidence::High => Ok(self),
            LayoutConfidence::Low { fallbacks } => Err(ShiftguardError::LowConfidenceLayout {
                fallbacks: fallbacks
                    .iter()
                    .map(|f| f.description().to_string())
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(confidence: LayoutConfidence) -> TableLayout {
        TableLayout {
            header_row: 0,
            columns: vec![
                ColumnRole::Identity {
                    label: "姓名".to_string(),
                },
                ColumnRole::Ignored,
                ColumnRole::Date(DateColumn::new("周六", Some(Weekday::Sat))),
                ColumnRole::Date(DateColumn::new("周一", Some(Weekday::Mon))),
            ],
            confidence,
        }
    }

    #[test]
    fn test_column_accessors() {
        let layout = layout(LayoutConfidence::High);
        assert_eq!(layout.identity_columns().collect::<Vec<_>>(), vec![0]);
        assert_eq!(layout.date_column_count(), 2);
        let (idx, first) = layout.date_columns().next().unwrap();
        assert_eq!(idx, 2);
        assert!(first.is_rest_eligible_day);
        assert_eq!(layout.identity_label(0), Some("姓名"));
    }

    #[test]
    fn test_require_confident() {
        assert!(layout(LayoutConfidence::High).require_confident().is_ok());

        let low = layout(LayoutConfidence::Low {
            fallbacks: vec![LayoutFallback::AllNonIdentityAsDates],
        });
        assert!(low.is_low_confidence());
        assert!(matches!(
            low.require_confident(),
            Err(ShiftguardError::LowConfidenceLayout { .. })
        ));
    }
}
