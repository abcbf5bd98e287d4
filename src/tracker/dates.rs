//! Lenient date parsing. Bad input is substituted with a default, never rejected.

use chrono::{DateTime, Local, NaiveDate};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse `YYYY-MM-DD`, `YYYY/MM/DD` or an RFC 3339 timestamp (keeping its local date).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_local().date())
}

pub fn application_date_or_today(raw: &str, today: NaiveDate) -> NaiveDate {
    parse_date(raw).unwrap_or(today)
}

pub fn closing_date_or_none(raw: &str) -> Option<NaiveDate> {
    parse_date(raw)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_date("2025-01-10"), Some(date(2025, 1, 10)));
        assert_eq!(parse_date(" 2025/01/10 "), Some(date(2025, 1, 10)));
        assert_eq!(
            parse_date("2025-01-10T23:30:00-05:00"),
            Some(date(2025, 1, 10))
        );
    }

    #[test]
    fn rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(parse_date("2025-02-30"), None);
    }

    #[test]
    fn application_date_falls_back_to_today() {
        let today = date(2025, 3, 4);
        assert_eq!(application_date_or_today("soon", today), today);
        assert_eq!(
            application_date_or_today("2025-02-01", today),
            date(2025, 2, 1)
        );
    }

    #[test]
    fn closing_date_falls_back_to_unset() {
        assert_eq!(closing_date_or_none("n/a"), None);
        assert_eq!(closing_date_or_none("2025-04-01"), Some(date(2025, 4, 1)));
    }
}
