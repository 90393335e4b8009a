use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate};

use crate::model::Ms;

pub const DAY_MS: Ms = 86_400_000;
pub const HOUR_MS: Ms = 3_600_000;

/// Midnight at or before `at`, in the calendar of `offset`. Saturates at
/// the ends of the `Ms` range.
pub fn start_of_day(at: Ms, offset: FixedOffset) -> Ms {
    let at = i128::from(at);
    let offset_ms = i128::from(offset.local_minus_utc()) * 1000;
    let midnight = at - (at + offset_ms).rem_euclid(i128::from(DAY_MS));
    Ms::try_from(midnight).unwrap_or(Ms::MIN)
}

/// Move `at` forward by whole calendar months, keeping the time of day.
///
/// The day of month is carried over as a day count, so a day the target
/// month lacks rolls into the next one: Aug 31 + 6 months is Mar 3 (or
/// Mar 2 in a leap year). Returns `None` outside chrono's range.
pub fn add_months(at: Ms, months: u32, offset: FixedOffset) -> Option<Ms> {
    let local = DateTime::from_timestamp_millis(at)?
        .with_timezone(&offset)
        .naive_local();
    let date = local.date();
    let month0 = date.month0().checked_add(months)?;
    let year = date.year().checked_add(i32::try_from(month0 / 12).ok()?)?;
    let first = NaiveDate::from_ymd_opt(year, month0 % 12 + 1, 1)?;
    let rolled = first.checked_add_days(Days::new(u64::from(date.day0())))?;
    let shifted = rolled.and_time(local.time()).and_utc().timestamp_millis();
    shifted.checked_sub(Ms::from(offset.local_minus_utc()) * 1000)
}
