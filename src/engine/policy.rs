use chrono::{FixedOffset, Offset, Utc};

/// Thresholds applied by the validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// Shortest allowed slot.
    pub min_slot_minutes: u16,
    /// Longest allowed slot.
    pub max_slot_minutes: u16,
    /// Slots longer than this draw a warning suggesting breaks.
    pub long_slot_minutes: u16,
    /// Lead time used when a request does not carry its own.
    pub default_lead_time_hours: u32,
    /// How far ahead a date range may reach, in calendar months from now.
    pub max_range_months: u32,
    /// Offset of the calendar that defines "today" and month boundaries.
    pub utc_offset: FixedOffset,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            min_slot_minutes: 60,
            max_slot_minutes: 12 * 60,
            long_slot_minutes: 6 * 60,
            default_lead_time_hours: 24,
            max_range_months: 6,
            utc_offset: Utc.fix(),
        }
    }
}
