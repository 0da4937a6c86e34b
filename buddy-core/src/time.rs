//! Time utilities: calendar-day math and timezone-aware "today".

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

/// Format used for login-calendar keys and persisted dates.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// The calendar day `now` falls on in an IANA tz like "America/Chicago".
pub fn local_date(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Parse a "YYYY-MM-DD" day, e.g. a goal deadline or a `--date` flag.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

pub fn date_key(day: NaiveDate) -> String {
    day.format(DATE_KEY_FORMAT).to_string()
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// True if `earlier` is exactly the calendar day before `later`.
pub fn is_previous_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    earlier.succ_opt() == Some(later)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_crosses_midnight() {
        // 03:00 UTC on Feb 21 is still Feb 20 in Chicago (UTC-6)
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 3, 0, 0).unwrap();
        let day = local_date(now, "America/Chicago").unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
        assert!(local_date(now, "Mars/Olympus").is_err());
    }

    #[test]
    fn test_first_of_month_and_keys() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();
        assert_eq!(first_of_month(d), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(date_key(d), "2026-03-17");
        assert_eq!(parse_date("2026-03-17").unwrap(), d);
        assert!(parse_date("17/03/2026").is_err());
    }

    #[test]
    fn test_is_previous_day_across_month_boundary() {
        let jan31 = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let feb1 = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert!(is_previous_day(jan31, feb1));
        assert!(!is_previous_day(feb1, jan31));
        assert!(!is_previous_day(jan31, jan31));
    }
}
