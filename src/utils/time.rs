use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};

/// Organization-local timezone. All calendar dates are anchored to IST
/// (UTC+05:30); instants are stored in UTC and converted at the boundary.
pub fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
}

/// Calendar date of an instant in the organization timezone.
pub fn date_at_ist(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&ist_offset()).date_naive()
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    Some(last_of_month(year, month)?.day())
}

/// Number of empty grid cells before day 1 on a Sunday-start calendar.
pub fn leading_blanks(year: i32, month: u32) -> Option<u32> {
    Some(first_of_month(year, month)?.weekday().num_days_from_sunday())
}

/// Empty grid cells after the last day, padding the final week to seven.
pub fn trailing_blanks(year: i32, month: u32) -> Option<u32> {
    let used = leading_blanks(year, month)? + days_in_month(year, month)?;
    Some((7 - used % 7) % 7)
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

pub fn weekday_short_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Su",
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 3), Some(31));
        assert_eq!(days_in_month(2025, 4), Some(30));
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn month_bounds() {
        assert_eq!(first_of_month(2025, 3), NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(last_of_month(2025, 3), NaiveDate::from_ymd_opt(2025, 3, 31));
        assert_eq!(last_of_month(2025, 12), NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn blanks_for_sunday_start_grid() {
        // March 2025 starts on a Saturday.
        assert_eq!(leading_blanks(2025, 3), Some(6));
        assert_eq!(trailing_blanks(2025, 3), Some(5));
        // June 2025 starts on a Sunday and fills exactly five weeks.
        assert_eq!(leading_blanks(2025, 6), Some(0));
        assert_eq!(trailing_blanks(2025, 6), Some(5));
    }

    #[test]
    fn month_navigation_wraps_years() {
        assert_eq!(next_month(2025, 12), (2026, 1));
        assert_eq!(next_month(2025, 6), (2025, 7));
    }

    #[test]
    fn ist_anchoring_shifts_the_date_across_midnight() {
        // 20:00 UTC is 01:30 IST the next day.
        let instant = Utc.with_ymd_and_hms(2025, 3, 9, 20, 0, 0).unwrap();
        assert_eq!(date_at_ist(instant), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        // 18:00 UTC is 23:30 IST the same day.
        let instant = Utc.with_ymd_and_hms(2025, 3, 9, 18, 0, 0).unwrap();
        assert_eq!(date_at_ist(instant), NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }
}
