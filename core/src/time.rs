use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

/// Calendar year on the host clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Accepts RFC 3339 timestamps (what `Reading` writes) and bare `YYYY-MM-DD` dates.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-03-05T10:20:30.123Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_offset_is_normalized() {
        let dt = parse_timestamp("2024-03-05T10:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2023-12-31").unwrap();
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
