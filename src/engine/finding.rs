use std::fmt;

use chrono::DateTime;
use serde::Serialize;

use crate::model::{Ms, OperatingHours, SlotBounds, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// One diagnostic produced by a validator. Rendered to text only through
/// `Display`; callers that branch on outcomes match on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    PastDate {
        date: Ms,
        today: Ms,
    },
    RangeBeyondHorizon {
        end: Ms,
        horizon: Ms,
        months: u32,
    },
    RangeInverted {
        start: Ms,
        end: Ms,
    },
    OutsideOperatingHours {
        slot: SlotBounds,
        hours: OperatingHours,
    },
    MalformedSlot {
        slot: SlotBounds,
    },
    SlotTooShort {
        slot: Span,
        minutes: u16,
        min_minutes: u16,
    },
    SlotTooLong {
        slot: Span,
        minutes: u16,
        max_minutes: u16,
    },
    LongSlot {
        slot: Span,
        minutes: u16,
        threshold_minutes: u16,
    },
    SlotsOverlap {
        first: Span,
        second: Span,
    },
    BookingConflict {
        slot: Span,
        booking: Span,
        #[serde(skip_serializing_if = "Option::is_none")]
        job_title: Option<String>,
    },
    TentativeConflict {
        slot: Span,
        booking: Span,
        #[serde(skip_serializing_if = "Option::is_none")]
        job_title: Option<String>,
    },
    InsideLeadTime {
        date: Ms,
        earliest: Ms,
        lead_time_hours: u32,
    },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::LongSlot { .. } | Finding::TentativeConflict { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Short stable label, used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::PastDate { .. } => "past_date",
            Finding::RangeBeyondHorizon { .. } => "range_beyond_horizon",
            Finding::RangeInverted { .. } => "range_inverted",
            Finding::OutsideOperatingHours { .. } => "outside_operating_hours",
            Finding::MalformedSlot { .. } => "malformed_slot",
            Finding::SlotTooShort { .. } => "slot_too_short",
            Finding::SlotTooLong { .. } => "slot_too_long",
            Finding::LongSlot { .. } => "long_slot",
            Finding::SlotsOverlap { .. } => "slots_overlap",
            Finding::BookingConflict { .. } => "booking_conflict",
            Finding::TentativeConflict { .. } => "tentative_conflict",
            Finding::InsideLeadTime { .. } => "inside_lead_time",
        }
    }
}

fn duration(minutes: u16) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m} minutes"),
        (1, 0) => "1 hour".to_string(),
        (h, 0) => format!("{h} hours"),
        (h, m) => format!("{h}h {m}m"),
    }
}

fn day(at: Ms) -> String {
    DateTime::from_timestamp_millis(at)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| at.to_string())
}

fn booking_label(job_title: &Option<String>) -> String {
    match job_title {
        Some(title) => format!(" ({title})"),
        None => String::new(),
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::PastDate { .. } => write!(f, "Cannot set availability for past dates"),
            Finding::RangeBeyondHorizon { months, horizon, .. } => write!(
                f,
                "Cannot set availability more than {months} months in advance (latest {})",
                day(*horizon)
            ),
            Finding::RangeInverted { .. } => write!(f, "Start date must be before end date"),
            Finding::OutsideOperatingHours { slot, hours } => write!(
                f,
                "Time slot {slot} is outside operating hours ({hours})"
            ),
            Finding::MalformedSlot { slot } => {
                write!(f, "Time slot {slot} must start before it ends")
            }
            Finding::SlotTooShort {
                slot,
                minutes,
                min_minutes,
            } => write!(
                f,
                "Time slot {slot} is {}; minimum duration is {}",
                duration(*minutes),
                duration(*min_minutes)
            ),
            Finding::SlotTooLong {
                slot,
                minutes,
                max_minutes,
            } => write!(
                f,
                "Time slot {slot} is {}; maximum duration is {}",
                duration(*minutes),
                duration(*max_minutes)
            ),
            Finding::LongSlot { slot, minutes, .. } => write!(
                f,
                "Time slot {slot} is {}; consider adding breaks",
                duration(*minutes)
            ),
            Finding::SlotsOverlap { first, second } => {
                write!(f, "Time slots {first} and {second} overlap")
            }
            Finding::BookingConflict {
                slot,
                booking,
                job_title,
            } => write!(
                f,
                "Time slot {slot} conflicts with confirmed booking {booking}{}",
                booking_label(job_title)
            ),
            Finding::TentativeConflict {
                slot,
                booking,
                job_title,
            } => write!(
                f,
                "Time slot {slot} overlaps tentative booking {booking}{}; proceed with caution",
                booking_label(job_title)
            ),
            Finding::InsideLeadTime {
                lead_time_hours, ..
            } => write!(
                f,
                "Availability changes require at least {lead_time_hours} hours notice"
            ),
        }
    }
}
