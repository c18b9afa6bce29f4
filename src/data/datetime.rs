use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats tried when a column might hold dates, most specific first.
pub const DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
];

/// How the cells of a date column are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// ISO 8601 with an offset, e.g. `2026-02-10T22:26:28.987Z`.
    Rfc3339,
    /// A chrono `strftime` pattern from [`DATE_PATTERNS`].
    Pattern(&'static str),
}

/// Pick the format that parses the most of the first 100 non-empty cells.
pub fn detect_date_format(values: &[String]) -> Option<DateFormat> {
    let sample: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(100)
        .collect();

    if sample.is_empty() {
        return None;
    }

    let score = |format: DateFormat| {
        let valid = sample.iter().filter(|s| parse_to_timestamp(s, format).is_some()).count();
        valid as f64 / sample.len() as f64
    };

    std::iter::once(DateFormat::Rfc3339)
        .chain(DATE_PATTERNS.iter().map(|&p| DateFormat::Pattern(p)))
        .map(|f| (f, score(f)))
        .filter(|&(_, s)| s > 0.0)
        .fold(None, |best: Option<(DateFormat, f64)>, (f, s)| match best {
            Some((_, bs)) if bs >= s => best,
            _ => Some((f, s)),
        })
        .map(|(f, _)| f)
}

/// Unix timestamp in seconds, keeping millisecond precision.
pub fn parse_to_timestamp(value: &str, format: DateFormat) -> Option<f64> {
    match format {
        DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.timestamp_millis() as f64 / 1000.0),
        DateFormat::Pattern(pattern) => {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
                Some(dt.and_utc().timestamp_millis() as f64 / 1000.0)
            } else {
                let d = NaiveDate::parse_from_str(value, pattern).ok()?;
                Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp() as f64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_rfc3339() {
        let v = strings(&["2026-02-10T22:26:28.987Z", "2026-02-10T22:26:29.000Z"]);
        assert_eq!(detect_date_format(&v), Some(DateFormat::Rfc3339));
    }

    #[test]
    fn test_detect_plain_dates() {
        let v = strings(&["2024-01-01", "2024-01-02", ""]);
        assert_eq!(detect_date_format(&v), Some(DateFormat::Pattern("%Y-%m-%d")));
    }

    #[test]
    fn test_detect_none_for_numbers() {
        assert_eq!(detect_date_format(&strings(&["1.5", "2.5"])), None);
        assert_eq!(detect_date_format(&[]), None);
    }

    #[test]
    fn test_parse_day_resolution() {
        let a = parse_to_timestamp("1970-01-02", DateFormat::Pattern("%Y-%m-%d")).unwrap();
        assert_eq!(a, 86_400.0);
    }

    #[test]
    fn test_parse_subsecond() {
        let t = parse_to_timestamp("1970-01-01T00:00:01.500Z", DateFormat::Rfc3339).unwrap();
        assert_eq!(t, 1.5);
    }
}
