use chrono::FixedOffset;

use crate::model::{DateRange, Ms};

use super::ValidationResult;
use super::calendar::{HOUR_MS, add_months, start_of_day};
use super::finding::Finding;

/// `date` must fall on today or later, compared at day granularity.
pub(crate) fn check_not_past_date(date: Ms, now: Ms, offset: FixedOffset) -> ValidationResult {
    let today = start_of_day(now, offset);
    let mut result = ValidationResult::new();
    if start_of_day(date, offset) < today {
        result.push(Finding::PastDate { date, today });
    }
    result
}

/// Both violations are reported when both apply.
pub(crate) fn check_date_range(
    range: &DateRange,
    now: Ms,
    max_months: u32,
    offset: FixedOffset,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    // Unrepresentable horizons are far enough out to never bind.
    let horizon = add_months(now, max_months, offset).unwrap_or(Ms::MAX);
    if range.end > horizon {
        result.push(Finding::RangeBeyondHorizon {
            end: range.end,
            horizon,
            months: max_months,
        });
    }
    if range.start > range.end {
        result.push(Finding::RangeInverted {
            start: range.start,
            end: range.end,
        });
    }
    result
}

/// Absolute-instant comparison: `date` must be at least `lead_time_hours` after now.
pub(crate) fn check_lead_time(date: Ms, now: Ms, lead_time_hours: u32) -> ValidationResult {
    let earliest = now.saturating_add(Ms::from(lead_time_hours) * HOUR_MS);
    let mut result = ValidationResult::new();
    if date < earliest {
        result.push(Finding::InsideLeadTime {
            date,
            earliest,
            lead_time_hours,
        });
    }
    result
}
