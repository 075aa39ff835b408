//! Date grammar, the same-day-only rule, and month-end computation.

use chrono::NaiveDate;

use crate::error::{AttendanceError, AttendanceResult};

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// The grammar is deliberately narrow: exactly ten characters, zero-padded
/// components, and a real calendar date. Anything else is rejected so that
/// sloppy inputs like `2025-3-5` or `2025/03/05` never reach the store.
///
/// # Example
///
/// ```
/// use attendance_engine::policy::parse_date;
/// use chrono::NaiveDate;
///
/// let date = parse_date("2025-03-15").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
/// assert!(parse_date("2025-3-15").is_err());
/// assert!(parse_date("2025-02-30").is_err());
/// ```
pub fn parse_date(value: &str) -> AttendanceResult<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());

    if !well_formed {
        return Err(AttendanceError::InvalidDate {
            value: value.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| AttendanceError::InvalidDate {
        value: value.to_string(),
    })
}

/// Enforces the same-day-only marking rule.
///
/// The attendance date must equal the store's current date exactly; a date
/// before today fails as a past date, and one after fails as a future date,
/// so callers can tell the two apart.
pub fn ensure_current_date(date: NaiveDate, today: NaiveDate) -> AttendanceResult<()> {
    if date < today {
        Err(AttendanceError::PastDate { date })
    } else if date > today {
        Err(AttendanceError::FutureDate { date })
    } else {
        Ok(())
    }
}

/// Returns the last calendar day of the month containing `date`.
///
/// Month-close status is keyed by month-end date, so this is the lookup key
/// for the close check. Leap years and variable month lengths fall out of
/// date arithmetic rather than a day table.
///
/// # Example
///
/// ```
/// use attendance_engine::policy::month_end;
/// use chrono::NaiveDate;
///
/// let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
/// assert_eq!(month_end(feb), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn month_end(date: NaiveDate) -> NaiveDate {
    use chrono::Datelike;

    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of a month is always valid")
        .pred_opt()
        .expect("day before the first of a month is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_valid_date() {
        assert_eq!(parse_date("2025-03-15").unwrap(), date("2025-03-15"));
        assert_eq!(parse_date("2024-02-29").unwrap(), date("2024-02-29"));
    }

    #[test]
    fn test_parse_rejects_malformed_grammar() {
        for bad in [
            "2025-3-15",
            "2025/03/15",
            "15-03-2025",
            "2025-03-15T00:00:00",
            "20250315",
            "",
            "yesterday",
        ] {
            let result = parse_date(bad);
            assert!(
                matches!(result, Err(AttendanceError::InvalidDate { .. })),
                "expected InvalidDate for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("2023-02-29").is_err()); // not a leap year
        assert!(parse_date("2025-04-31").is_err());
    }

    #[test]
    fn test_ensure_current_date_accepts_today() {
        assert!(ensure_current_date(date("2025-03-15"), date("2025-03-15")).is_ok());
    }

    #[test]
    fn test_ensure_current_date_distinguishes_past_from_future() {
        let today = date("2025-03-15");
        assert!(matches!(
            ensure_current_date(date("2025-03-14"), today),
            Err(AttendanceError::PastDate { .. })
        ));
        assert!(matches!(
            ensure_current_date(date("2025-03-16"), today),
            Err(AttendanceError::FutureDate { .. })
        ));
    }

    #[test]
    fn test_month_end_regular_months() {
        assert_eq!(month_end(date("2025-01-01")), date("2025-01-31"));
        assert_eq!(month_end(date("2025-04-10")), date("2025-04-30"));
        assert_eq!(month_end(date("2025-12-25")), date("2025-12-31"));
    }

    #[test]
    fn test_month_end_february_leap_years() {
        assert_eq!(month_end(date("2024-02-01")), date("2024-02-29"));
        assert_eq!(month_end(date("2023-02-15")), date("2023-02-28"));
        assert_eq!(month_end(date("2000-02-01")), date("2000-02-29"));
        assert_eq!(month_end(date("1900-02-01")), date("1900-02-28"));
    }

    proptest! {
        #[test]
        fn prop_month_end_is_in_same_month_and_terminal(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            use chrono::Datelike;

            let d = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            let end = month_end(d);

            prop_assert_eq!(end.year(), d.year());
            prop_assert_eq!(end.month(), d.month());
            prop_assert!(end >= d);
            // The following day belongs to the next month.
            let next = end.succ_opt().unwrap();
            prop_assert_ne!(next.month(), d.month());
        }

        #[test]
        fn prop_round_trip_parse_display(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let d = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            let parsed = parse_date(&d.format("%Y-%m-%d").to_string()).unwrap();
            prop_assert_eq!(parsed, d);
        }
    }
}
