use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use metering_core::{compute_expiration, day_floor, Period};

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn midnight(y: i32, m: u32, d: u32) -> i64 {
    utc(y, m, d, 0).timestamp()
}

#[test]
fn day_ends_at_next_midnight() {
    // 2024-03-14 is a Thursday.
    let now = utc(2024, 3, 14, 10);
    assert_eq!(compute_expiration(Period::Day, &now), midnight(2024, 3, 15));
}

#[test]
fn day_crosses_month_and_leap_day() {
    assert_eq!(
        compute_expiration(Period::Day, &utc(2024, 2, 28, 23)),
        midnight(2024, 2, 29)
    );
    assert_eq!(
        compute_expiration(Period::Day, &utc(2024, 2, 29, 1)),
        midnight(2024, 3, 1)
    );
}

#[test]
fn week_ends_on_upcoming_saturday() {
    // Sunday through Friday all land on Saturday 2024-03-16.
    for day in 10..=15 {
        let now = utc(2024, 3, day, 9);
        assert_eq!(
            compute_expiration(Period::Week, &now),
            midnight(2024, 3, 16),
            "day {day}"
        );
    }
}

#[test]
fn week_on_saturday_expires_at_start_of_same_day() {
    let now = utc(2024, 3, 16, 10);
    let expiration = compute_expiration(Period::Week, &now);
    assert_eq!(expiration, day_floor(&now));
    assert_eq!(expiration, midnight(2024, 3, 16));
}

#[test]
fn month_ends_on_first_of_next_month() {
    assert_eq!(
        compute_expiration(Period::Month, &utc(2024, 1, 31, 12)),
        midnight(2024, 2, 1)
    );
    assert_eq!(
        compute_expiration(Period::Month, &utc(2024, 12, 1, 0)),
        midnight(2025, 1, 1)
    );
}

#[test]
fn year_ends_on_next_january_first() {
    assert_eq!(
        compute_expiration(Period::Year, &utc(2024, 1, 1, 0)),
        midnight(2025, 1, 1)
    );
    assert_eq!(
        compute_expiration(Period::Year, &utc(2024, 12, 31, 23)),
        midnight(2025, 1, 1)
    );
}

#[test]
fn boundaries_follow_local_midnight() {
    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    // 22:00 local on the 14th is already the 15th in UTC.
    let now = tz.with_ymd_and_hms(2024, 3, 14, 22, 0, 0).unwrap();
    let expected = tz.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
    assert_eq!(compute_expiration(Period::Day, &now), expected.timestamp());
}

#[test]
fn expiration_is_after_day_floor_except_saturday_week() {
    let periods = [Period::Day, Period::Week, Period::Month, Period::Year];
    let start = utc(2023, 12, 20, 7);
    for offset_hours in (0..24 * 60).step_by(5) {
        let now = start + chrono::Duration::hours(offset_hours);
        let floor = day_floor(&now);
        for period in periods {
            let expiration = compute_expiration(period, &now);
            let saturday_week = period == Period::Week
                && now.format("%a").to_string() == "Sat";
            if saturday_week {
                assert_eq!(expiration, floor, "{period:?} at {now}");
            } else {
                assert!(expiration > floor, "{period:?} at {now}");
            }
        }
    }
}
