use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Length of the window over which free views are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    /// Any period name the host sent that we do not know about.
    #[serde(other)]
    Unrecognized,
}

/// Unix timestamp of local midnight at the start of `now`'s calendar day.
pub fn day_floor<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    local_midnight(&now.timezone(), now.date_naive())
}

/// Unix timestamp (seconds) at which the period containing `now` ends.
///
/// `now` is first floored to local midnight. Weeks end on the upcoming
/// Saturday, which is today when today is already a Saturday.
/// `Period::Unrecognized` passes the floored day through unchanged.
pub fn compute_expiration<Tz: TimeZone>(period: Period, now: &DateTime<Tz>) -> i64 {
    let today = now.date_naive();
    let boundary = match period {
        Period::Day => today.checked_add_days(Days::new(1)),
        Period::Week => {
            let to_saturday = 6 - u64::from(today.weekday().num_days_from_sunday());
            today.checked_add_days(Days::new(to_saturday))
        }
        Period::Month => today
            .with_day(1)
            .and_then(|first| first.checked_add_months(Months::new(1))),
        Period::Year => NaiveDate::from_ymd_opt(today.year() + 1, 1, 1),
        Period::Unrecognized => Some(today),
    };
    local_midnight(&now.timezone(), boundary.unwrap_or(today))
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(at) = tz.from_local_datetime(&midnight).earliest() {
        return at.timestamp();
    }
    // Midnight fell into a DST gap; the day starts at the first valid hour.
    tz.from_local_datetime(&(midnight + Duration::hours(1)))
        .earliest()
        .map(|at| at.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}
