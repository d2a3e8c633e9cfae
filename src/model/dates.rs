use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Time given to records seeded for a day with no explicit time.
pub const SEEDED_HOUR: u32 = 9;

pub fn at_default_time(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(SEEDED_HOUR, 0, 0).unwrap_or(NaiveTime::MIN))
}

pub fn truncate_subsec(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub fn year_start(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Move by whole months, clamping the day to the target month's length.
pub fn add_months(day: NaiveDate, delta: i32) -> NaiveDate {
    let zero_based = day.year() * 12 + day.month0() as i32 + delta;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let dom = day.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, dom).unwrap_or(day)
}

pub fn add_days(day: NaiveDate, delta: i64) -> NaiveDate {
    day.checked_add_signed(Duration::days(delta)).unwrap_or(day)
}

/// Weeks (Monday first) covering the month of `day`, including the
/// leading and trailing days of neighbouring months.
pub fn month_weeks(day: NaiveDate) -> Vec<[NaiveDate; 7]> {
    let first = month_start(day);
    let last = add_days(add_months(first, 1), -1);
    let mut cursor = week_start(first);
    let mut weeks = Vec::new();
    while cursor <= last {
        let mut week = [cursor; 7];
        for (offset, slot) in week.iter_mut().enumerate() {
            *slot = add_days(cursor, offset as i64);
        }
        weeks.push(week);
        cursor = add_days(cursor, 7);
    }
    weeks
}

pub fn month_title(day: NaiveDate) -> String {
    day.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2026, 1, 31), 1), d(2026, 2, 28));
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months(d(2026, 1, 15), -1), d(2025, 12, 15));
        assert_eq!(add_months(d(2026, 3, 31), -13), d(2025, 2, 28));
        assert_eq!(add_months(d(2026, 5, 10), 12), d(2027, 5, 10));
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2026-10-18 is a Sunday
        assert_eq!(week_start(d(2026, 10, 18)), d(2026, 10, 12));
        assert_eq!(week_start(d(2026, 10, 12)), d(2026, 10, 12));
    }

    #[test]
    fn test_month_weeks_cover_whole_month() {
        let weeks = month_weeks(d(2026, 2, 14));
        // February 2026 starts on a Sunday and ends on a Saturday.
        assert_eq!(weeks.first().unwrap()[0], d(2026, 1, 26));
        assert_eq!(weeks.last().unwrap()[6], d(2026, 3, 1));
        assert_eq!(weeks.len(), 5);
    }

    #[test]
    fn test_seed_time_is_nine() {
        assert_eq!(
            at_default_time(d(2026, 1, 2)).format("%H:%M:%S").to_string(),
            "09:00:00"
        );
    }
}
