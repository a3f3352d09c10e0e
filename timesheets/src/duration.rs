//! Duration strings
//!
//! Task item durations are stored as `HH:MM:SS` text. Hours may exceed 23
//! when a total spans more than a day.

use crate::error::{AppError, Result};
use chrono::{Duration, NaiveTime};

/// Parse an `HH:MM:SS` string into a duration
pub fn parse(value: &str) -> Result<Duration> {
    let invalid = || AppError::InvalidDuration(value.to_string());

    let mut parts = value.trim().split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
    let seconds: i64 = seconds.parse().map_err(|_| invalid())?;

    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(invalid());
    }

    hours
        .checked_mul(3600)
        .and_then(|secs| secs.checked_add(minutes * 60 + seconds))
        .and_then(Duration::try_seconds)
        .ok_or_else(invalid)
}

/// Format a duration as `HH:MM:SS`, truncating sub-second precision.
/// Negative durations keep their sign: `-00:30:00`.
pub fn format(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Duration between a start and an end time on the same day
pub fn between(start: NaiveTime, end: NaiveTime) -> Result<Duration> {
    if end <= start {
        return Err(AppError::InvalidTimeRange);
    }
    Ok(end - start)
}

/// Sum a list of `HH:MM:SS` strings. Any malformed entry fails the whole sum.
pub fn total<S: AsRef<str>>(durations: &[S]) -> Result<Duration> {
    durations
        .iter()
        .try_fold(Duration::zero(), |acc, d| {
            let d = d.as_ref();
            acc.checked_add(&parse(d)?)
                .ok_or_else(|| AppError::InvalidDuration(d.to_string()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let d = parse("01:30:15").unwrap();
        assert_eq!(d.num_seconds(), 5415);
        assert_eq!(format(d), "01:30:15");
    }

    #[test]
    fn test_format_over_a_day() {
        assert_eq!(format(Duration::hours(27) + Duration::minutes(5)), "27:05:00");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse("1:30").is_err());
        assert!(parse("aa:00:00").is_err());
        assert!(parse("01:60:00").is_err());
        assert!(parse("01:00:00:00").is_err());
    }

    #[test]
    fn test_parse_out_of_range_hours_is_an_error() {
        assert!(matches!(
            parse("99999999999999:00:00"),
            Err(AppError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse("9999999999999999999:00:00"),
            Err(AppError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_format_keeps_sign() {
        assert_eq!(format(Duration::minutes(-30)), "-00:30:00");
        assert_eq!(format(Duration::zero()), "00:00:00");
    }

    #[test]
    fn test_between() {
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let end = NaiveTime::from_hms_opt(10, 45, 0).unwrap();

        assert_eq!(format(between(start, end).unwrap()), "01:45:00");
        assert!(matches!(between(end, start), Err(AppError::InvalidTimeRange)));
        assert!(matches!(between(start, start), Err(AppError::InvalidTimeRange)));
    }

    #[test]
    fn test_total() {
        let sum = total(&["00:30:00", "01:15:30", "00:00:30"]).unwrap();
        assert_eq!(format(sum), "01:46:00");

        let empty: [&str; 0] = [];
        assert_eq!(total(&empty).unwrap(), Duration::zero());

        assert!(total(&["00:30:00", "bogus"]).is_err());
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let near_max = "2000000000000:00:00";
        assert!(parse(near_max).is_ok());
        assert!(matches!(
            total(&[near_max, near_max, near_max, near_max, near_max]),
            Err(AppError::InvalidDuration(_))
        ));
    }
}
