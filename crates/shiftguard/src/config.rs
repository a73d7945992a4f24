//! Versioned rule-set configuration.
//!
//! Shift-code vocabularies, header keywords and validation limits are data,
//! not code: a deployment can ship its own JSON file and every field left out
//! falls back to the defaults below.
//!
//! ```
//! use shiftguard::ShiftguardConfig;
//!
//! let config = ShiftguardConfig::from_json_str(
//!     r#"{ "version": 1, "policy": { "max_consecutive_workdays": 6 } }"#,
//! ).unwrap();
//! assert_eq!(config.policy.max_consecutive_workdays, 6);
//! assert_eq!(config.policy.weekly_workdays_max, 6.0);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShiftguardError};
use crate::schema::CanonicalShiftKind;

/// Configuration schema version understood by this build.
pub const CONFIG_VERSION: u32 = 1;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Token lists the shift classifier matches against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftVocabulary {
    /// Exact rest markers.
    pub rest_markers: Vec<String>,
    /// Substrings marking a night shift.
    pub night_markers: Vec<String>,
    /// Prefixes/substrings marking a weekend shift.
    pub weekend_markers: Vec<String>,
    /// Substrings marking a named special workday shift.
    pub special_markers: Vec<String>,
    /// Exact plain-workday tokens.
    pub workday_tokens: Vec<String>,
}

impl Default for ShiftVocabulary {
    fn default() -> Self {
        Self {
            rest_markers: strings(&["休", "休息"]),
            night_markers: strings(&["Y16"]),
            weekend_markers: strings(&["G值", "G值-A", "G值-B", "G值-C", "周末"]),
            special_markers: strings(&["Y1030"]),
            workday_tokens: strings(&["G"]),
        }
    }
}

/// Keywords and thresholds for layout inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutKeywords {
    /// Rows scanned when looking for the header.
    pub scan_window: usize,
    /// Header substrings marking identity columns (case-insensitive).
    pub identity_keywords: Vec<String>,
    /// Identity-header substrings marking the employee name column.
    pub name_keywords: Vec<String>,
    /// Regexes a date header must match.
    pub date_patterns: Vec<String>,
    /// Date columns a detection stage must produce to be accepted.
    pub min_date_columns: usize,
    /// Recognised shift codes a row needs to mark the row above as header.
    pub min_shift_codes_in_row: usize,
    /// Rows below the header sampled when detecting dates from content.
    pub content_sample_rows: usize,
}

impl Default for LayoutKeywords {
    fn default() -> Self {
        Self {
            scan_window: 10,
            identity_keywords: strings(&[
                "部门",
                "工号",
                "用户ID",
                "姓名",
                "员工",
                "岗位",
                "department",
                "employee",
                "staff id",
                "name",
            ]),
            name_keywords: strings(&["姓名", "name"]),
            date_patterns: strings(&[
                r"\d{1,2}\s*[月日号]",
                r"\d{4}-\d{1,2}-\d{1,2}",
                r"\d{4}/\d{1,2}/\d{1,2}",
                r"^\d{1,2}/\d{1,2}$",
                r"星期[一二三四五六日天]",
                r"周[一二三四五六日天]",
                r"(?i)^(mon|tue|wed|thu|fri|sat|sun)",
            ]),
            min_date_columns: 5,
            min_shift_codes_in_row: 5,
            content_sample_rows: 8,
        }
    }
}

/// An expected head-count for one shift kind on every date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyRule {
    /// Name used in findings.
    pub name: String,
    /// Kind being counted.
    pub kind: CanonicalShiftKind,
    /// Employees expected per date.
    pub expected: usize,
}

/// Limits applied by the schedule validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Longest allowed run of consecutive workdays.
    pub max_consecutive_workdays: usize,
    /// Lower bound on average workdays per seven days (inclusive).
    pub weekly_workdays_min: f64,
    /// Upper bound on average workdays per seven days (inclusive).
    pub weekly_workdays_max: f64,
    /// Non-absent entries needed before a row is validated.
    pub min_entries_per_row: usize,
    /// Identity-cell substrings marking section headers and notes.
    pub section_markers: Vec<String>,
    /// Date-scoped occupancy checks.
    pub occupancy: Vec<OccupancyRule>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_workdays: 7,
            weekly_workdays_min: 4.0,
            weekly_workdays_max: 6.0,
            min_entries_per_row: 5,
            section_markers: strings(&["注意：", "排班信息", "部门", "风险-", "风险室-"]),
            occupancy: vec![OccupancyRule {
                name: "night_shift_single_occupancy".to_string(),
                kind: CanonicalShiftKind::NightShift,
                expected: 1,
            }],
        }
    }
}

/// Complete rule set for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftguardConfig {
    /// Schema version of this file.
    pub version: u32,
    /// Shift-code vocabulary.
    pub vocabulary: ShiftVocabulary,
    /// Layout inference keywords.
    pub layout: LayoutKeywords,
    /// Validation limits.
    pub policy: ValidationPolicy,
}

impl Default for ShiftguardConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            vocabulary: ShiftVocabulary::default(),
            layout: LayoutKeywords::default(),
            policy: ValidationPolicy::default(),
        }
    }
}

impl ShiftguardConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ShiftguardError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(ShiftguardError::Config(format!(
                "unsupported config version {} (expected {})",
                self.version, CONFIG_VERSION
            )));
        }
        if self.layout.scan_window == 0 {
            return Err(ShiftguardError::Config(
                "layout.scan_window must be at least 1".to_string(),
            ));
        }
        let policy = &self.policy;
        let (min, max) = (policy.weekly_workdays_min, policy.weekly_workdays_max);
        if min.is_nan() || max.is_nan() || min > max {
            return Err(ShiftguardError::Config(format!(
                "weekly workday bounds are inverted: [{}, {}]",
                policy.weekly_workdays_min, policy.weekly_workdays_max
            )));
        }
        if self.vocabulary.rest_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(ShiftguardError::Config(
                "vocabulary.rest_markers must name at least one marker".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ShiftguardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ShiftguardConfig::from_json_str(
            r#"{"version": 1, "vocabulary": {"night_markers": ["N"]}}"#,
        )
        .unwrap();
        assert_eq!(config.vocabulary.night_markers, vec!["N"]);
        assert_eq!(config.vocabulary.rest_markers, vec!["休", "休息"]);
        assert_eq!(config.layout.scan_window, 10);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = ShiftguardConfig::from_json_str(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(err, ShiftguardError::Config(_)));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = ShiftguardConfig::from_json_str(
            r#"{"policy": {"weekly_workdays_min": 6.0, "weekly_workdays_max": 4.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ShiftguardError::Config(_)));
    }

    #[test]
    fn test_occupancy_rule_from_json() {
        let config = ShiftguardConfig::from_json_str(
            r#"{"policy": {"occupancy": [{"name": "weekend", "kind": "weekend_shift", "expected": 2}]}}"#,
        )
        .unwrap();
        assert_eq!(config.policy.occupancy.len(), 1);
        assert_eq!(config.policy.occupancy[0].kind, CanonicalShiftKind::WeekendShift);
        assert_eq!(config.policy.occupancy[0].expected, 2);
    }
}
