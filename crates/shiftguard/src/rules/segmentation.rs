//! Range segmentation of a sparse label row.

use crate::input::TableView;
use crate::schema::BusinessLineRange;

/// Split a row's columns into contiguous labelled ranges.
///
/// Scans left to right once. Every non-empty string cell opens a new range
/// and closes the previous one at its own column; the last range closes at
/// the table width. Columns before the first label belong to no range.
/// Ranges are therefore contiguous, non-overlapping and ordered by start.
pub fn segment_ranges(table: &TableView, row: usize) -> Vec<BusinessLineRange> {
    let mut ranges = Vec::new();
    let mut open: Option<(String, usize)> = None;

    for col in 0..table.column_count() {
        if let Some(label) = table.text(row, col) {
            if let Some((name, start)) = open.take() {
                ranges.push(BusinessLineRange {
                    name,
                    start,
                    end: col,
                });
            }
            open = Some((label.to_string(), col));
        }
    }

    if let Some((name, start)) = open {
        ranges.push(BusinessLineRange {
            name,
            start,
            end: table.column_count(),
        });
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CellValue;

    #[test]
    fn test_segments_sparse_row() {
        let table = TableView::from_strings(&[vec!["", "对公", "", "", "个人", "", "风险"]]);
        let ranges = segment_ranges(&table, 0);

        let spans: Vec<_> = ranges
            .iter()
            .map(|r| (r.name.as_str(), r.start, r.end))
            .collect();
        assert_eq!(spans, vec![("对公", 1, 4), ("个人", 4, 6), ("风险", 6, 7)]);
    }

    #[test]
    fn test_ranges_are_contiguous() {
        let table = TableView::from_strings(&[vec!["a", "", "b", "c", "", "", "d", ""]]);
        let ranges = segment_ranges(&table, 0);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(ranges.last().unwrap().end, 8);
    }

    #[test]
    fn test_numbers_do_not_open_ranges() {
        let table = TableView::new(vec![vec![
            CellValue::Text("对公".to_string()),
            CellValue::Number(2024.0),
            CellValue::Empty,
        ]]);
        let ranges = segment_ranges(&table, 0);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].end, 3);
    }

    #[test]
    fn test_empty_row_has_no_ranges() {
        let table = TableView::from_strings(&[vec!["", ""]]);
        assert!(segment_ranges(&table, 0).is_empty());
    }
}
