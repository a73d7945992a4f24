//! Header-row and column-role inference for schedule sheets.

use chrono::{NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::classifier::ShiftClassifier;
use crate::config::LayoutKeywords;
use crate::error::{Result, ShiftguardError};
use crate::input::TableView;
use crate::schema::{ColumnRole, DateColumn, LayoutConfidence, LayoutFallback, TableLayout};

// Calendar dates embedded in header labels, used for weekday tagging.
static CALENDAR_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})[-/](\d{1,2})[-/](\d{1,2})").expect("valid calendar date pattern")
});

/// Ways of locating the header row, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStrategy {
    /// A row with an identity keyword and a date-like label.
    Keywords,
    /// The row above one filled with recognised shift codes.
    ShiftCodeRow,
}

impl HeaderStrategy {
    /// Strategies in priority order.
    pub const ORDER: [HeaderStrategy; 2] = [HeaderStrategy::Keywords, HeaderStrategy::ShiftCodeRow];

    fn fallback(self) -> Option<LayoutFallback> {
        match self {
            HeaderStrategy::Keywords => None,
            HeaderStrategy::ShiftCodeRow => Some(LayoutFallback::HeaderFromShiftCodes),
        }
    }
}

/// Ways of picking date columns once the header row is known, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// Header text matches a date pattern.
    HeaderPatterns,
    /// Header pattern, or the cells below hold recognised shift codes.
    CellContents,
    /// Every non-identity column.
    AllNonIdentity,
}

impl DateStrategy {
    /// Strategies in priority order.
    pub const ORDER: [DateStrategy; 3] = [
        DateStrategy::HeaderPatterns,
        DateStrategy::CellContents,
        DateStrategy::AllNonIdentity,
    ];

    fn fallback(self) -> Option<LayoutFallback> {
        match self {
            DateStrategy::HeaderPatterns => None,
            DateStrategy::CellContents => Some(LayoutFallback::DatesFromContent),
            DateStrategy::AllNonIdentity => Some(LayoutFallback::AllNonIdentityAsDates),
        }
    }
}

/// Locates the header row and classifies schedule columns.
pub struct LayoutInferencer {
    keywords: LayoutKeywords,
    identity_keywords: Vec<String>,
    name_keywords: Vec<String>,
    date_patterns: Vec<Regex>,
    classifier: ShiftClassifier,
}

impl LayoutInferencer {
    /// Build an inferencer, compiling the configured date patterns.
    pub fn new(keywords: LayoutKeywords, classifier: ShiftClassifier) -> Result<Self> {
        let date_patterns = keywords
            .date_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let lowered = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };

        Ok(Self {
            identity_keywords: lowered(&keywords.identity_keywords),
            name_keywords: lowered(&keywords.name_keywords),
            date_patterns,
            keywords,
            classifier,
        })
    }

    /// Infer the layout of a schedule sheet.
    ///
    /// Fails with [`ShiftguardError::LayoutNotFound`] when no strategy finds a
    /// header row within the scan window.
    pub fn infer(&self, table: &TableView) -> Result<TableLayout> {
        let window = self.keywords.scan_window.min(table.row_count());

        let (header_row, header_fallback) = HeaderStrategy::ORDER
            .iter()
            .find_map(|&strategy| {
                self.locate_header(strategy, table, window)
                    .map(|row| (row, strategy.fallback()))
            })
            .ok_or(ShiftguardError::LayoutNotFound {
                scanned_rows: window,
            })?;

        let mut fallbacks: Vec<LayoutFallback> = header_fallback.into_iter().collect();
        let labels: Vec<String> = (0..table.column_count())
            .map(|col| {
                table
                    .display(header_row, col)
                    .map(|s| s.into_owned())
                    .unwrap_or_default()
            })
            .collect();

        let mut identity: Vec<bool> = labels.iter().map(|l| self.is_identity_label(l)).collect();
        if !identity.iter().any(|&is_id| is_id) && !identity.is_empty() {
            identity[0] = true;
            fallbacks.push(LayoutFallback::FirstColumnAsIdentity);
        }

        let mut date_flags = Vec::new();
        for strategy in DateStrategy::ORDER {
            date_flags = self.select_dates(strategy, table, header_row, &labels, &identity);
            let found = date_flags.iter().filter(|&&d| d).count();
            debug!(?strategy, found, "date column detection");
            if found >= self.keywords.min_date_columns || strategy == DateStrategy::AllNonIdentity {
                fallbacks.extend(strategy.fallback());
                break;
            }
        }

        let columns = labels
            .into_iter()
            .enumerate()
            .map(|(col, label)| {
                if identity[col] {
                    ColumnRole::Identity { label }
                } else if date_flags.get(col).copied().unwrap_or(false) {
                    let weekday = weekday_of(&label);
                    ColumnRole::Date(DateColumn::new(label, weekday))
                } else {
                    ColumnRole::Ignored
                }
            })
            .collect();

        let confidence = if fallbacks.is_empty() {
            LayoutConfidence::High
        } else {
            warn!(
                header_row,
                fallbacks = ?fallbacks,
                "schedule layout inferred with fallback heuristics"
            );
            LayoutConfidence::Low { fallbacks }
        };

        Ok(TableLayout {
            header_row,
            columns,
            confidence,
        })
    }

    fn locate_header(
        &self,
        strategy: HeaderStrategy,
        table: &TableView,
        window: usize,
    ) -> Option<usize> {
        let found = match strategy {
            HeaderStrategy::Keywords => (0..window).find(|&row| self.is_keyword_header(table, row)),
            HeaderStrategy::ShiftCodeRow => (0..window).find(|&row| {
                row + 1 < table.row_count()
                    && self.recognised_codes_in_row(table, row + 1)
                        >= self.keywords.min_shift_codes_in_row
            }),
        };
        if let Some(row) = found {
            debug!(?strategy, row, "header row located");
        }
        found
    }

    fn is_keyword_header(&self, table: &TableView, row: usize) -> bool {
        let mut has_identity = false;
        let mut has_date = false;
        for col in 0..table.column_count() {
            let Some(text) = table.display(row, col) else {
                continue;
            };
            if self.is_identity_label(&text) {
                has_identity = true;
            } else if self.is_date_label(&text) {
                has_date = true;
            }
        }
        has_identity && has_date
    }

    fn recognised_codes_in_row(&self, table: &TableView, row: usize) -> usize {
        (0..table.column_count())
            .filter_map(|col| table.display(row, col))
            .filter(|code| self.classifier.is_recognised(code))
            .count()
    }

    fn select_dates(
        &self,
        strategy: DateStrategy,
        table: &TableView,
        header_row: usize,
        labels: &[String],
        identity: &[bool],
    ) -> Vec<bool> {
        labels
            .iter()
            .enumerate()
            .map(|(col, label)| {
                if identity[col] {
                    return false;
                }
                match strategy {
                    DateStrategy::HeaderPatterns => self.is_date_label(label),
                    DateStrategy::CellContents => {
                        self.is_date_label(label)
                            || self.column_has_shift_codes(table, header_row, col)
                    }
                    DateStrategy::AllNonIdentity => true,
                }
            })
            .collect()
    }

    fn column_has_shift_codes(&self, table: &TableView, header_row: usize, col: usize) -> bool {
        let first = header_row + 1;
        let last = (first + self.keywords.content_sample_rows).min(table.row_count());
        (first..last)
            .filter_map(|row| table.display(row, col))
            .any(|code| self.classifier.is_recognised(&code))
    }

    /// Returns true if a header label names an identity field.
    pub fn is_identity_label(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        self.identity_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Returns true if a header label names the employee-name field.
    pub fn is_name_label(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        self.name_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Returns true if a header label looks like a date or weekday.
    pub fn is_date_label(&self, label: &str) -> bool {
        let label = label.trim();
        !label.is_empty() && self.date_patterns.iter().any(|p| p.is_match(label))
    }
}

/// Weekday named by a header label, from a weekday token or a calendar date.
pub fn weekday_of(label: &str) -> Option<Weekday> {
    let chars: Vec<char> = label.chars().collect();
    for (idx, window) in chars.windows(2).enumerate() {
        let token = match window {
            ['周', c] => Some(*c),
            ['星', '期'] => chars.get(idx + 2).copied(),
            _ => None,
        };
        if let Some(day) = token.and_then(chinese_weekday) {
            return Some(day);
        }
    }

    let lower = label.trim().to_lowercase();
    let english = [
        ("mon", Weekday::Mon),
        ("tue", Weekday::Tue),
        ("wed", Weekday::Wed),
        ("thu", Weekday::Thu),
        ("fri", Weekday::Fri),
        ("sat", Weekday::Sat),
        ("sun", Weekday::Sun),
    ];
    if let Some((_, day)) = english.iter().find(|(prefix, _)| lower.starts_with(prefix)) {
        return Some(*day);
    }

    let caps = CALENDAR_DATE.captures(label)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| chrono::Datelike::weekday(&d))
}

fn chinese_weekday(c: char) -> Option<Weekday> {
    match c {
        '一' => Some(Weekday::Mon),
        '二' => Some(Weekday::Tue),
        '三' => Some(Weekday::Wed),
        '四' => Some(Weekday::Thu),
        '五' => Some(Weekday::Fri),
        '六' => Some(Weekday::Sat),
        '日' | '天' => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inferencer() -> LayoutInferencer {
        LayoutInferencer::new(LayoutKeywords::default(), ShiftClassifier::default()).unwrap()
    }

    const WEEK: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

    fn header_row() -> Vec<String> {
        let mut row = vec!["部门".to_string(), "姓名".to_string()];
        row.extend(WEEK.iter().map(|d| d.to_string()));
        row
    }

    fn data_row(name: &str) -> Vec<String> {
        let mut row = vec!["风险".to_string(), name.to_string()];
        row.extend(["G", "G", "G", "G", "G", "休", "休"].map(String::from));
        row
    }

    #[test]
    fn test_header_found_at_row_five() {
        let mut rows: Vec<Vec<String>> = vec![
            vec!["排班信息".to_string()],
            vec![],
            vec!["班次G: 08:30-17:30".to_string()],
            vec![],
            vec!["注意：节假日另行通知".to_string()],
        ];
        rows.push(header_row());
        rows.push(data_row("张三"));
        let table = TableView::from_strings(&rows);

        let layout = inferencer().infer(&table).unwrap();
        assert_eq!(layout.header_row, 5);
        assert_eq!(layout.identity_columns().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(layout.date_column_count(), 7);
        assert!(!layout.is_low_confidence());
    }

    #[test]
    fn test_no_header_in_window_fails() {
        let mut rows: Vec<Vec<String>> = (0..10).map(|i| vec![format!("备注{i}")]).collect();
        rows.push(header_row());
        rows.push(data_row("张三"));
        let table = TableView::from_strings(&rows);

        let err = inferencer().infer(&table).unwrap_err();
        assert!(matches!(err, ShiftguardError::LayoutNotFound { scanned_rows: 10 }));
    }

    #[test]
    fn test_shift_code_row_fallback() {
        let rows = vec![
            vec!["A", "B", "C", "D", "E", "F", "G1"],
            vec!["张三", "G", "G", "Y16", "G值", "休", "G"],
            vec!["李四", "休", "G", "G", "G", "G", "G"],
        ];
        let table = TableView::from_strings(&rows);

        let layout = inferencer().infer(&table).unwrap();
        assert_eq!(layout.header_row, 0);
        assert!(layout.fallbacks().contains(&LayoutFallback::HeaderFromShiftCodes));
        assert!(layout.fallbacks().contains(&LayoutFallback::FirstColumnAsIdentity));
        assert!(layout.fallbacks().contains(&LayoutFallback::DatesFromContent));
        assert_eq!(layout.date_column_count(), 6);
    }

    #[test]
    fn test_identity_takes_precedence_over_date() {
        let inf = inferencer();
        assert!(inf.is_date_label("1月"));
        assert!(inf.is_identity_label("部门1月"));

        let mut header = header_row();
        header.push("部门1月".to_string());
        let mut data = data_row("张三");
        data.push("G".to_string());
        let table = TableView::from_strings(&[header, data]);

        let layout = inf.infer(&table).unwrap();
        assert!(matches!(layout.columns[9], ColumnRole::Identity { .. }));
    }

    #[test]
    fn test_all_non_identity_fallback() {
        let rows = vec![
            vec!["姓名", "1日", "备注", "说明", "其他", "更多"],
            vec!["张三", "G", "", "", "", ""],
        ];
        let table = TableView::from_strings(&rows);

        let layout = inferencer().infer(&table).unwrap();
        assert_eq!(layout.date_column_count(), 5);
        assert!(layout.fallbacks().contains(&LayoutFallback::AllNonIdentityAsDates));
        assert!(layout.require_confident().is_err());
    }

    #[test]
    fn test_other_columns_ignored() {
        let mut header = header_row();
        header.push("备注".to_string());
        let table = TableView::from_strings(&[header, data_row("张三")]);

        let layout = inferencer().infer(&table).unwrap();
        assert_eq!(layout.columns[9], ColumnRole::Ignored);
    }

    #[test]
    fn test_weekday_tags() {
        assert_eq!(weekday_of("周六"), Some(Weekday::Sat));
        assert_eq!(weekday_of("1月5日 星期日"), Some(Weekday::Sun));
        assert_eq!(weekday_of("Tue 7"), Some(Weekday::Tue));
        assert_eq!(weekday_of("2025-01-04"), Some(Weekday::Sat));
        assert_eq!(weekday_of("2025/1/6"), Some(Weekday::Mon));
        assert_eq!(weekday_of("1日"), None);

        let date = DateColumn::new("2025-01-04", weekday_of("2025-01-04"));
        assert!(date.is_rest_eligible_day);
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        let keywords = LayoutKeywords {
            date_patterns: vec!["(".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            LayoutInferencer::new(keywords, ShiftClassifier::default()),
            Err(ShiftguardError::Regex(_))
        ));
    }
}
