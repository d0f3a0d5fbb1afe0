use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// English month names, indexed by month number - 1
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Maximum day count per calendar month.
/// February is always 29: birthdays are treated as calendar-day patterns,
/// not year-bound dates, so Feb 29 is accepted as a birth date in any year.
pub fn days_in_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Calendar date on which a recurring (month, day) birthday next falls,
/// relative to `today`. A birthday equal to today counts as this year
/// (days-until 0), not next year.
///
/// Callers must guarantee `1 <= birth_month <= 12` and
/// `1 <= birth_day <= days_in_month(birth_month)`.
pub fn next_occurrence(birth_month: u32, birth_day: u32, today: NaiveDate) -> NaiveDate {
    let current_month = today.month();
    let current_day = today.day();

    let year = if birth_month < current_month
        || (birth_month == current_month && birth_day < current_day)
    {
        today.year() + 1
    } else {
        today.year()
    };

    // Feb 29 in a non-leap target year rolls over to March 1
    NaiveDate::from_ymd_opt(year, birth_month, birth_day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 3, 1).unwrap_or(today))
}

/// Whole days from `today` forward to the next occurrence.
/// 0 on the birthday itself, 1 the day before, wrapped distance
/// (up to 366) when the birthday has already passed this year.
pub fn days_until(birth_month: u32, birth_day: u32, today: NaiveDate) -> i64 {
    (next_occurrence(birth_month, birth_day, today) - today).num_days()
}

/// Next occurrence as a Unix-nanosecond timestamp (midnight UTC).
/// This is what gift plans store as their target date.
pub fn occurrence_nanos(birth_month: u32, birth_day: u32, today: NaiveDate) -> i64 {
    next_occurrence(birth_month, birth_day, today)
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_nanos_opt().unwrap_or(0))
        .unwrap_or(0)
}

/// Age as of `today`, or None when no birth year is recorded.
pub fn current_age(
    birth_year: Option<i32>,
    birth_month: u32,
    birth_day: u32,
    today: NaiveDate,
) -> Option<i32> {
    let birth_year = birth_year?;
    let mut age = today.year() - birth_year;

    // Birthday not yet reached this year
    if birth_month > today.month() || (birth_month == today.month() && birth_day > today.day()) {
        age -= 1;
    }

    Some(age)
}

/// Age the contact turns on their next birthday, or None when no birth
/// year is recorded. On the birthday itself this equals `current_age`,
/// consistent with `days_until` returning 0 on that date.
pub fn age_at_next_birthday(
    birth_year: Option<i32>,
    birth_month: u32,
    birth_day: u32,
    today: NaiveDate,
) -> Option<i32> {
    let birth_year = birth_year?;
    let mut age = today.year() - birth_year;

    // Birthday already passed this year, so they turn age + 1 next year
    if birth_month < today.month() || (birth_month == today.month() && birth_day < today.day()) {
        age += 1;
    }

    Some(age)
}

/// `"June 1"` or `"June 1, 1990"` when a birth year is present.
/// An out-of-range month renders as "Unknown".
pub fn format_birthday_label(month: u32, day: u32, year: Option<i32>) -> String {
    let month_name = MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown");
    match year {
        Some(year) => format!("{} {}, {}", month_name, day, year),
        None => format!("{} {}", month_name, day),
    }
}

/// Human-readable "last updated" string for a Unix-nanosecond timestamp.
/// Recent times render relative ("just now", "5 minutes ago", ...), older
/// ones as a short absolute date, with the year only when it differs from
/// the current one. Unrepresentable timestamps render "Invalid date".
pub fn format_relative_timestamp(timestamp_nanos: i64, now: DateTime<Utc>) -> String {
    let secs = timestamp_nanos.div_euclid(NANOS_PER_SECOND);
    let subsec = timestamp_nanos.rem_euclid(NANOS_PER_SECOND) as u32;
    let Some(then) = DateTime::<Utc>::from_timestamp(secs, subsec) else {
        return "Invalid date".to_string();
    };

    let diff_seconds = (now - then).num_seconds();
    let diff_minutes = diff_seconds / 60;
    let diff_hours = diff_minutes / 60;
    let diff_days = diff_hours / 24;

    if diff_seconds < 60 {
        return "just now".to_string();
    }
    if diff_minutes < 60 {
        return format!("{} minute{} ago", diff_minutes, plural(diff_minutes));
    }
    if diff_hours < 24 {
        return format!("{} hour{} ago", diff_hours, plural(diff_hours));
    }
    if diff_days < 7 {
        return format!("{} day{} ago", diff_days, plural(diff_days));
    }

    if then.year() == now.year() {
        then.format("%b %-d").to_string()
    } else {
        then.format("%b %-d, %Y").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month_table() {
        assert_eq!(days_in_month(1), 31);
        assert_eq!(days_in_month(4), 30);
        assert_eq!(days_in_month(6), 30);
        assert_eq!(days_in_month(9), 30);
        assert_eq!(days_in_month(11), 30);
        assert_eq!(days_in_month(12), 31);
    }

    #[test]
    fn test_february_always_has_29_days() {
        // Documented policy: no leap-year detection, Feb 29 is always allowed
        assert_eq!(days_in_month(2), 29);
    }

    #[test]
    fn test_next_occurrence_later_this_year() {
        let today = date(2024, 3, 15);
        assert_eq!(next_occurrence(6, 1, today), date(2024, 6, 1));
        assert_eq!(next_occurrence(3, 16, today), date(2024, 3, 16));
        assert_eq!(next_occurrence(12, 31, today), date(2024, 12, 31));
    }

    #[test]
    fn test_next_occurrence_wraps_to_next_year() {
        let today = date(2024, 3, 15);
        assert_eq!(next_occurrence(1, 10, today), date(2025, 1, 10));
        assert_eq!(next_occurrence(3, 14, today), date(2025, 3, 14));
    }

    #[test]
    fn test_next_occurrence_today_stays_this_year() {
        let today = date(2024, 3, 15);
        assert_eq!(next_occurrence(3, 15, today), today);
    }

    #[test]
    fn test_next_occurrence_feb_29_non_leap_rolls_to_march_1() {
        // Next Feb 29 after 2025-03-01 would fall in non-leap 2026
        let today = date(2025, 3, 1);
        assert_eq!(next_occurrence(2, 29, today), date(2026, 3, 1));
        // But in a leap year it resolves exactly
        assert_eq!(next_occurrence(2, 29, date(2024, 1, 1)), date(2024, 2, 29));
    }

    #[test]
    fn test_next_occurrence_within_366_days() {
        let today = date(2024, 2, 10);
        for month in 1..=12 {
            for day in 1..=days_in_month(month) {
                let next = next_occurrence(month, day, today);
                assert!(next >= today, "{}-{} fell in the past", month, day);
                assert!(
                    (next - today).num_days() <= 366,
                    "{}-{} more than 366 days out",
                    month,
                    day
                );
            }
        }
    }

    #[test]
    fn test_days_until_zero_on_the_birthday() {
        for month in 1..=12u32 {
            for day in 1..=days_in_month(month) {
                // Pick a year where the (month, day) exists as a real date
                let today = NaiveDate::from_ymd_opt(2024, month, day).unwrap();
                assert_eq!(days_until(month, day, today), 0);
            }
        }
    }

    #[test]
    fn test_days_until_tomorrow_is_one() {
        assert_eq!(days_until(3, 16, date(2024, 3, 15)), 1);
    }

    #[test]
    fn test_days_until_yesterday_wraps() {
        // 2024 is a leap year: Mar 15 2024 -> Mar 14 2025 is 364 days
        assert_eq!(days_until(3, 14, date(2024, 3, 15)), 364);
    }

    #[test]
    fn test_occurrence_nanos_is_midnight_utc() {
        let today = date(2024, 3, 15);
        let nanos = occurrence_nanos(6, 1, today);
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(nanos, expected.timestamp_nanos_opt().unwrap());
    }

    #[test]
    fn test_current_age_before_and_after_birthday() {
        let birth_year = Some(1990);
        assert_eq!(current_age(birth_year, 6, 1, date(2024, 5, 1)), Some(33));
        assert_eq!(current_age(birth_year, 6, 1, date(2024, 7, 1)), Some(34));
    }

    #[test]
    fn test_current_age_on_the_birthday() {
        assert_eq!(current_age(Some(1990), 6, 1, date(2024, 6, 1)), Some(34));
    }

    #[test]
    fn test_current_age_none_without_birth_year() {
        assert_eq!(current_age(None, 6, 1, date(2024, 5, 1)), None);
    }

    #[test]
    fn test_age_at_next_birthday() {
        let birth_year = Some(1990);
        // Birthday not yet reached: they turn 34 this year
        assert_eq!(
            age_at_next_birthday(birth_year, 6, 1, date(2024, 5, 1)),
            Some(34)
        );
        // Birthday passed: they turn 35 next year
        assert_eq!(
            age_at_next_birthday(birth_year, 6, 1, date(2024, 7, 1)),
            Some(35)
        );
        // On the day itself: the age turned today, no increment
        assert_eq!(
            age_at_next_birthday(birth_year, 6, 1, date(2024, 6, 1)),
            Some(34)
        );
        assert_eq!(age_at_next_birthday(None, 6, 1, date(2024, 5, 1)), None);
    }

    #[test]
    fn test_ages_differ_by_one_except_on_the_birthday() {
        let birth_year = Some(1990);
        for month in 1..=12u32 {
            for day in [1, 15, 28] {
                let today = date(2024, 8, 15);
                let current = current_age(birth_year, month, day, today).unwrap();
                let next = age_at_next_birthday(birth_year, month, day, today).unwrap();
                if month == today.month() && day == today.day() {
                    assert_eq!(current, next);
                } else {
                    assert_eq!(next - current, 1, "month {} day {}", month, day);
                }
            }
        }
    }

    #[test]
    fn test_format_birthday_label() {
        assert_eq!(format_birthday_label(6, 1, None), "June 1");
        assert_eq!(format_birthday_label(6, 1, Some(1990)), "June 1, 1990");
        assert_eq!(format_birthday_label(12, 25, None), "December 25");
        assert_eq!(format_birthday_label(0, 1, None), "Unknown 1");
        assert_eq!(format_birthday_label(13, 1, None), "Unknown 1");
    }

    fn nanos_of(dt: DateTime<Utc>) -> i64 {
        dt.timestamp_nanos_opt().unwrap()
    }

    #[test]
    fn test_relative_timestamp_just_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let then = now - chrono::Duration::seconds(45);
        assert_eq!(format_relative_timestamp(nanos_of(then), now), "just now");
    }

    #[test]
    fn test_relative_timestamp_minutes() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let one = now - chrono::Duration::minutes(1);
        assert_eq!(format_relative_timestamp(nanos_of(one), now), "1 minute ago");
        let many = now - chrono::Duration::minutes(45);
        assert_eq!(
            format_relative_timestamp(nanos_of(many), now),
            "45 minutes ago"
        );
    }

    #[test]
    fn test_relative_timestamp_hours() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        // 90 minutes is past the minute bucket, so it truncates to 1 hour
        let then = now - chrono::Duration::minutes(90);
        assert_eq!(format_relative_timestamp(nanos_of(then), now), "1 hour ago");
        let then = now - chrono::Duration::hours(5);
        assert_eq!(format_relative_timestamp(nanos_of(then), now), "5 hours ago");
    }

    #[test]
    fn test_relative_timestamp_days() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let then = now - chrono::Duration::days(3);
        assert_eq!(format_relative_timestamp(nanos_of(then), now), "3 days ago");
    }

    #[test]
    fn test_relative_timestamp_absolute_same_year() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let then = now - chrono::Duration::days(10);
        assert_eq!(format_relative_timestamp(nanos_of(then), now), "Jun 5");
    }

    #[test]
    fn test_relative_timestamp_absolute_other_year() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let then = Utc.with_ymd_and_hms(2023, 11, 2, 8, 30, 0).unwrap();
        assert_eq!(
            format_relative_timestamp(nanos_of(then), now),
            "Nov 2, 2023"
        );
    }

    #[test]
    fn test_engine_functions_are_pure() {
        let today = date(2024, 3, 15);
        assert_eq!(
            next_occurrence(3, 14, today),
            next_occurrence(3, 14, today)
        );
        assert_eq!(days_until(3, 14, today), days_until(3, 14, today));
        assert_eq!(
            current_age(Some(1990), 3, 14, today),
            current_age(Some(1990), 3, 14, today)
        );
    }
}
