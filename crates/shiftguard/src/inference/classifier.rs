//! Shift-code classification.

use crate::config::ShiftVocabulary;
use crate::schema::CanonicalShiftKind;

/// Maps raw shift codes to canonical kinds with ordered pattern rules.
///
/// Rules are tried in this order and the first match wins:
///
/// 1. exact rest marker → [`CanonicalShiftKind::Rest`]
/// 2. contains a night marker → [`CanonicalShiftKind::NightShift`]
/// 3. contains a weekend marker → [`CanonicalShiftKind::WeekendShift`]
/// 4. contains a special-workday marker → [`CanonicalShiftKind::WorkdaySpecialShift`]
/// 5. exact workday token → [`CanonicalShiftKind::NormalWorkday`]
/// 6. anything else → [`CanonicalShiftKind::Unclassified`]
///
/// Night outranks weekend, so `Y16G值` is a night shift.
///
/// Empty cells are "no entry" and should never be classified; an empty
/// string is still accepted and yields `Unclassified` so the function
/// stays total.
#[derive(Debug, Clone)]
pub struct ShiftClassifier {
    vocabulary: ShiftVocabulary,
}

impl ShiftClassifier {
    /// Create a classifier for a vocabulary.
    ///
    /// Blank tokens are dropped: a blank substring would match every code.
    pub fn new(vocabulary: ShiftVocabulary) -> Self {
        fn clean(tokens: Vec<String>) -> Vec<String> {
            tokens
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        }

        Self {
            vocabulary: ShiftVocabulary {
                rest_markers: clean(vocabulary.rest_markers),
                night_markers: clean(vocabulary.night_markers),
                weekend_markers: clean(vocabulary.weekend_markers),
                special_markers: clean(vocabulary.special_markers),
                workday_tokens: clean(vocabulary.workday_tokens),
            },
        }
    }

    /// The vocabulary in use.
    pub fn vocabulary(&self) -> &ShiftVocabulary {
        &self.vocabulary
    }

    /// Classify one raw shift code.
    pub fn classify(&self, code: &str) -> CanonicalShiftKind {
        let code = code.trim();
        let vocab = &self.vocabulary;

        if vocab.rest_markers.iter().any(|m| m == code) {
            CanonicalShiftKind::Rest
        } else if vocab.night_markers.iter().any(|m| code.contains(m.as_str())) {
            CanonicalShiftKind::NightShift
        } else if vocab
            .weekend_markers
            .iter()
            .any(|m| code.contains(m.as_str()))
        {
            CanonicalShiftKind::WeekendShift
        } else if vocab
            .special_markers
            .iter()
            .any(|m| code.contains(m.as_str()))
        {
            CanonicalShiftKind::WorkdaySpecialShift
        } else if vocab.workday_tokens.iter().any(|t| t == code) {
            CanonicalShiftKind::NormalWorkday
        } else {
            CanonicalShiftKind::Unclassified
        }
    }

    /// Returns true if the code maps to any kind other than `Unclassified`.
    pub fn is_recognised(&self, code: &str) -> bool {
        self.classify(code) != CanonicalShiftKind::Unclassified
    }
}

impl Default for ShiftClassifier {
    fn default() -> Self {
        Self::new(ShiftVocabulary::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CanonicalShiftKind as K;

    #[test]
    fn test_default_vocabulary() {
        let c = ShiftClassifier::default();
        assert_eq!(c.classify("休"), K::Rest);
        assert_eq!(c.classify("休息"), K::Rest);
        assert_eq!(c.classify("Y16"), K::NightShift);
        assert_eq!(c.classify("Y16综"), K::NightShift);
        assert_eq!(c.classify("G值"), K::WeekendShift);
        assert_eq!(c.classify("G值-B"), K::WeekendShift);
        assert_eq!(c.classify("周末G班"), K::WeekendShift);
        assert_eq!(c.classify("Y1030普"), K::WorkdaySpecialShift);
        assert_eq!(c.classify("G"), K::NormalWorkday);
        assert_eq!(c.classify(" G "), K::NormalWorkday);
        assert_eq!(c.classify("年假"), K::Unclassified);
        assert_eq!(c.classify(""), K::Unclassified);
    }

    #[test]
    fn test_rest_is_exact_match() {
        let c = ShiftClassifier::default();
        assert_eq!(c.classify("休假中"), K::Unclassified);
    }

    #[test]
    fn test_workday_is_exact_match() {
        let c = ShiftClassifier::default();
        assert_eq!(c.classify("GX"), K::Unclassified);
    }

    #[test]
    fn test_night_outranks_weekend_and_special() {
        let c = ShiftClassifier::default();
        assert_eq!(c.classify("G值Y16"), K::NightShift);
        assert_eq!(c.classify("Y16Y1030"), K::NightShift);
        assert_eq!(c.classify("G值Y1030"), K::WeekendShift);
    }

    #[test]
    fn test_blank_markers_ignored() {
        let c = ShiftClassifier::new(ShiftVocabulary {
            night_markers: vec![String::new(), "N".to_string()],
            ..Default::default()
        });
        assert_eq!(c.classify("G"), K::NormalWorkday);
        assert_eq!(c.classify("N1"), K::NightShift);
    }

    #[test]
    fn test_is_recognised() {
        let c = ShiftClassifier::default();
        assert!(c.is_recognised("休"));
        assert!(!c.is_recognised("张三"));
    }
}
