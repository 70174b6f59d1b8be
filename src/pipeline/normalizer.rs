//! Date normalization: sort rows chronologically by the detected date column.
//!
//! Normalization is all-or-nothing. If any non-empty cell in the column fails
//! to parse, the table is left exactly as ingested.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::table::{Cell, Table};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%d-%b-%Y", "%b %d, %Y",
];

/// Parse a text value as a calendar date or timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    // Monthly billing exports often carry "YYYY-MM" only
    if s.len() == 7 && s.as_bytes()[4] == b'-' {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    None
}

/// Date value of a cell. `Ok(None)` for an empty cell, `Err(())` when the
/// cell holds something that is not a date.
fn cell_date(cell: &Cell) -> Result<Option<NaiveDateTime>, ()> {
    match cell {
        Cell::Date(dt) => Ok(Some(*dt)),
        Cell::Text(s) => parse_date(s).map(Some).ok_or(()),
        Cell::Empty => Ok(None),
        Cell::Number(_) => Err(()),
    }
}

/// Sort `table` ascending by `column`. Returns whether the sort was applied.
///
/// The sort is stable; rows with an empty date keep their relative order
/// after every dated row.
pub fn normalize_dates(table: &mut Table, column: &str) -> bool {
    let Some(values) = table.column_values(column) else {
        debug!("Date column {} not present, skipping normalization", column);
        return false;
    };

    let mut keys = Vec::with_capacity(table.len());
    for (idx, cell) in values.enumerate() {
        match cell_date(cell) {
            Ok(key) => keys.push(key),
            Err(()) => {
                debug!(
                    "Row {} of {} is not a date ({:?}), leaving rows unsorted",
                    idx + 1,
                    column,
                    cell.to_string()
                );
                return false;
            }
        }
    }

    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| match (keys[a], keys[b]) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    table.reorder(&order);

    debug!("Sorted {} rows by {}", table.len(), column);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    fn table(dates: &[Cell]) -> Table {
        Table::new(
            vec!["Date".to_string(), "Usage".to_string()],
            dates
                .iter()
                .enumerate()
                .map(|(i, d)| vec![d.clone(), Cell::Number(i as f64)])
                .collect(),
        )
        .unwrap()
    }

    fn usage_column(table: &Table) -> Vec<f64> {
        table
            .column_values("Usage")
            .unwrap()
            .filter_map(|c| c.as_f64())
            .collect()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-03-01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024/03/01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("03/01/2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("01.03.2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("01-Mar-2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("Mar 01, 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-03"), Some(ymd(2024, 3, 1)));
        assert_eq!(
            parse_date("2024-03-01 13:45:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(13, 45, 0)
        );
        assert_eq!(
            parse_date("2024-03-01T13:45:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(13, 45, 0)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("12345"), None);
    }

    #[test]
    fn test_sorts_ascending_and_carries_rows() {
        let mut t = table(&[text("2024-03-02"), text("2024-03-01")]);
        assert!(normalize_dates(&mut t, "Date"));
        let dates: Vec<String> = t
            .column_values("Date")
            .unwrap()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02"]);
        assert_eq!(usage_column(&t), vec![1.0, 0.0]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut t = table(&[
            text("2024-01-02"),
            text("2024-01-01"),
            text("2024-01-02"),
            text("2024-01-01"),
        ]);
        assert!(normalize_dates(&mut t, "Date"));
        assert_eq!(usage_column(&t), vec![1.0, 3.0, 0.0, 2.0]);
    }

    #[test]
    fn test_mixed_formats_compare_chronologically() {
        let mut t = table(&[text("02/15/2024"), text("2024-01-31")]);
        assert!(normalize_dates(&mut t, "Date"));
        assert_eq!(usage_column(&t), vec![1.0, 0.0]);
    }

    #[test]
    fn test_unparseable_cell_abandons_sort() {
        let mut t = table(&[text("2024-03-02"), text("pending"), text("2024-03-01")]);
        let before = t.clone();
        assert!(!normalize_dates(&mut t, "Date"));
        assert_eq!(t, before);
    }

    #[test]
    fn test_numeric_cell_abandons_sort() {
        let mut t = table(&[text("2024-03-02"), Cell::Number(45352.0)]);
        let before = t.clone();
        assert!(!normalize_dates(&mut t, "Date"));
        assert_eq!(t, before);
    }

    #[test]
    fn test_empty_dates_sort_last() {
        let mut t = table(&[
            Cell::Empty,
            text("2024-03-02"),
            Cell::Empty,
            text("2024-03-01"),
        ]);
        assert!(normalize_dates(&mut t, "Date"));
        assert_eq!(usage_column(&t), vec![3.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_values_are_not_rewritten() {
        let mut t = table(&[text("03/02/2024"), text("03/01/2024")]);
        assert!(normalize_dates(&mut t, "Date"));
        assert_eq!(t.cell(0, "Date"), Some(&text("03/01/2024")));
    }

    #[test]
    fn test_spreadsheet_dates_sort() {
        let mut t = table(&[Cell::Date(ymd(2024, 5, 1)), Cell::Date(ymd(2023, 5, 1))]);
        assert!(normalize_dates(&mut t, "Date"));
        assert_eq!(usage_column(&t), vec![1.0, 0.0]);
    }

    #[test]
    fn test_missing_column_is_noop() {
        let mut t = table(&[text("2024-03-02")]);
        assert!(!normalize_dates(&mut t, "Reading Date"));
    }
}
