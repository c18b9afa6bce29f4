use chrono::{NaiveDate, NaiveDateTime};

/// How many leading rows are inspected when looking for the header.
pub const HEADER_SCAN_ROWS: usize = 50;

/// Detect the header row among the first [`HEADER_SCAN_ROWS`] rows.
///
/// Scans bottom-up for the last row whose filled cells are all text (not
/// numbers, not dates) and which fills as many cells as the widest row.
/// Returns 0 when no such row exists.
pub fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let scanned = &rows[..rows.len().min(HEADER_SCAN_ROWS)];

    let filled = |row: &Vec<String>| row.iter().filter(|c| !c.trim().is_empty()).count();
    let widest = scanned.iter().map(filled).max().unwrap_or(0);
    if widest == 0 {
        return 0;
    }

    for i in (0..scanned.len()).rev() {
        let row = &scanned[i];
        if filled(row) < widest {
            continue;
        }

        let all_text = row
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .all(|c| c.parse::<f64>().is_err() && !is_date_like(c));

        if all_text {
            return i;
        }
    }

    0
}

pub fn is_date_like(s: &str) -> bool {
    let lower = s.to_lowercase();
    let has_separators = s.contains('/') || s.contains(':') || s.contains('-');
    let has_date_words = lower.contains("am") || lower.contains("pm");

    if !has_separators && !has_date_words {
        return false;
    }

    const FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%Y-%m-%d",
        "%m/%d/%Y",
    ];
    if chrono::DateTime::parse_from_rfc3339(s).is_ok() {
        return true;
    }
    FORMATS.iter().any(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt).is_ok() || NaiveDate::parse_from_str(s, fmt).is_ok()
    })
}
