//! Shift definitions written as free text above a schedule's header.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::input::TableView;

static SHIFT_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"班次\s*([\w-]+?)\s*[:：]\s*(\d{1,2}:\d{2})\s*[-~至]\s*(次日)?\s*(\d{1,2}:\d{2})")
        .expect("valid shift definition pattern")
});

/// One shift code and its working hours, e.g. `班次Y16: 16:00-次日00:30`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// Shift code as written.
    pub code: String,
    /// Start time, `HH:MM`.
    pub start: String,
    /// End time, `HH:MM`.
    pub end: String,
    /// Ends on the following day.
    pub overnight: bool,
}

/// Collect shift definitions from every text cell in rows `0..before_row`.
///
/// A code defined twice keeps its first definition.
pub fn extract_shift_legend(table: &TableView, before_row: usize) -> Vec<ShiftDefinition> {
    let mut legend: Vec<ShiftDefinition> = Vec::new();

    for row in 0..before_row.min(table.row_count()) {
        for cell in table.row(row) {
            let Some(text) = cell.as_str() else {
                continue;
            };
            for def in parse_definitions(text) {
                if !legend.iter().any(|d| d.code == def.code) {
                    legend.push(def);
                }
            }
        }
    }

    legend
}

/// Parse every shift definition in a piece of text.
pub fn parse_definitions(text: &str) -> Vec<ShiftDefinition> {
    SHIFT_DEFINITION
        .captures_iter(text)
        .map(|caps| {
            let start = caps[2].to_string();
            let end = caps[4].to_string();
            let overnight = caps.get(3).is_some() || minutes(&end) < minutes(&start);
            ShiftDefinition {
                code: caps[1].to_string(),
                start,
                end,
                overnight,
            }
        })
        .collect()
}

fn minutes(time: &str) -> u32 {
    let mut parts = time.split(':').map(|p| p.parse::<u32>().unwrap_or(0));
    let hours = parts.next().unwrap_or(0);
    let mins = parts.next().unwrap_or(0);
    hours * 60 + mins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_definitions() {
        let defs = parse_definitions("排班信息 班次G: 08:30-17:30，班次Y16：16:00-次日00:30");
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].code, "G");
        assert_eq!(defs[0].start, "08:30");
        assert!(!defs[0].overnight);
        assert_eq!(defs[1].code, "Y16");
        assert_eq!(defs[1].end, "00:30");
        assert!(defs[1].overnight);
    }

    #[test]
    fn test_overnight_from_times() {
        let defs = parse_definitions("班次N: 22:00-06:00");
        assert!(defs[0].overnight);
    }

    #[test]
    fn test_extract_only_above_header() {
        let table = TableView::from_strings(&[
            vec!["班次G: 08:30-17:30", ""],
            vec!["", "班次G: 09:00-18:00 班次Y1030普: 10:30-19:30"],
            vec!["姓名", "班次Z: 01:00-02:00"],
        ]);
        let legend = extract_shift_legend(&table, 2);
        let codes: Vec<_> = legend.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["G", "Y1030普"]);
        assert_eq!(legend[0].start, "08:30");
    }
}
