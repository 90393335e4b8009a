use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only instant type.
pub type Ms = i64;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not of the form `HH:MM`.
    Format(String),
    /// Hour or minute outside the 24-hour clock.
    OutOfRange(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Format(s) => write!(f, "invalid time {s:?}: expected zero-padded HH:MM"),
            ParseError::OutOfRange(s) => write!(f, "invalid time {s:?}: outside 00:00..24:00"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Wall-clock time of day as minutes since midnight.
///
/// `24:00` is accepted as the end of the day so operating hours can run to
/// midnight; everything else lies in `00:00..=23:59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn hm(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(ParseError::Format(s.to_string()));
        }
        let digits = |a: u8, b: u8| -> Option<u16> {
            if a.is_ascii_digit() && b.is_ascii_digit() {
                Some(((a - b'0') * 10 + (b - b'0')) as u16)
            } else {
                None
            }
        };
        let (Some(hour), Some(minute)) = (digits(bytes[0], bytes[1]), digits(bytes[3], bytes[4]))
        else {
            return Err(ParseError::Format(s.to_string()));
        };
        if hour > 24 || minute >= 60 || (hour == 24 && minute != 0) {
            return Err(ParseError::OutOfRange(s.to_string()));
        }
        Ok(Self(hour * 60 + minute))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Half-open interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Span {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if `self` fully contains `other`, boundaries inclusive.
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Unavailable,
    Tentative,
    Booked,
}

/// One proposed or existing interval on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default)]
    pub status: AvailabilityStatus,
    /// Confirmed booking when true; a tentative hold otherwise.
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Ulid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_per_hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TimeSlot {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            start,
            end,
            status: AvailabilityStatus::Available,
            is_booked: false,
            booking_id: None,
            job_title: None,
            client_name: None,
            rate_per_hour: None,
            notes: None,
        }
    }

    /// A confirmed booking occupying `[start, end)`.
    pub fn booked(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            status: AvailabilityStatus::Booked,
            is_booked: true,
            booking_id: Some(Ulid::new()),
            ..Self::new(start, end)
        }
    }

    /// A tentative hold occupying `[start, end)`.
    pub fn tentative(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            status: AvailabilityStatus::Tentative,
            ..Self::new(start, end)
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// The slot's extent, or `None` when `start >= end`.
    pub fn span(&self) -> Option<Span> {
        self.is_well_formed().then(|| Span::new(self.start, self.end))
    }

    /// Start/end pair without the payload, for diagnostics.
    pub fn bounds(&self) -> SlotBounds {
        SlotBounds {
            start: self.start,
            end: self.end,
        }
    }
}

/// Start/end of a slot as written by the caller, possibly inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBounds {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl fmt::Display for SlotBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Daily window inside which all availability must fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl OperatingHours {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            start: TimeOfDay::MIDNIGHT,
            end: TimeOfDay::END_OF_DAY,
        }
    }
}

impl fmt::Display for OperatingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Inclusive calendar span, as instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "crate::engine::rfc3339")]
    pub start: Ms,
    #[serde(with = "crate::engine::rfc3339")]
    pub end: Ms,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_format() {
        assert_eq!(t("00:00").minutes(), 0);
        assert_eq!(t("09:30").minutes(), 570);
        assert_eq!(t("23:59").minutes(), 1439);
        assert_eq!(t("24:00"), TimeOfDay::END_OF_DAY);
        assert_eq!(t("07:05").to_string(), "07:05");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!("9:00".parse::<TimeOfDay>(), Err(ParseError::Format(_))));
        assert!(matches!("09-00".parse::<TimeOfDay>(), Err(ParseError::Format(_))));
        assert!(matches!("ab:cd".parse::<TimeOfDay>(), Err(ParseError::Format(_))));
        assert!(matches!("25:00".parse::<TimeOfDay>(), Err(ParseError::OutOfRange(_))));
        assert!(matches!("12:60".parse::<TimeOfDay>(), Err(ParseError::OutOfRange(_))));
        assert!(matches!("24:01".parse::<TimeOfDay>(), Err(ParseError::OutOfRange(_))));
    }

    #[test]
    fn hm_constructor() {
        assert_eq!(TimeOfDay::hm(14, 15), Some(t("14:15")));
        assert_eq!(TimeOfDay::hm(10, 60), None);
        assert_eq!(TimeOfDay::hm(24, 1), None);
        assert_eq!(TimeOfDay::hm(2000, 0), None);
        assert_eq!(TimeOfDay::hm(u16::MAX, 59), None);
    }

    #[test]
    fn span_overlap() {
        let a = Span::new(t("09:00"), t("11:00"));
        let b = Span::new(t("10:00"), t("12:00"));
        let c = Span::new(t("11:00"), t("13:00"));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
        assert_eq!(a.duration_minutes(), 120);
    }

    #[test]
    fn span_contains_span() {
        let outer = Span::new(t("06:00"), t("23:00"));
        let inner = Span::new(t("09:00"), t("23:00"));
        let partial = Span::new(t("05:00"), t("07:00"));
        assert!(outer.contains_span(&inner));
        assert!(outer.contains_span(&outer)); // self-containment
        assert!(!outer.contains_span(&partial));
    }

    #[test]
    fn inverted_slot_has_no_span() {
        let slot = TimeSlot::new(t("12:00"), t("10:00"));
        assert!(!slot.is_well_formed());
        assert_eq!(slot.span(), None);

        let empty = TimeSlot::new(t("10:00"), t("10:00"));
        assert_eq!(empty.span(), None);
    }

    #[test]
    fn slot_json_defaults() {
        let slot: TimeSlot = serde_json::from_str(r#"{"start":"09:00","end":"12:00"}"#).unwrap();
        assert_eq!(slot.status, AvailabilityStatus::Available);
        assert!(!slot.is_booked);
        assert_eq!(slot.job_title, None);

        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["start"], "09:00");
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn date_range_json_uses_rfc3339() {
        let range: DateRange =
            serde_json::from_str(r#"{"start":"2026-11-01T00:00:00Z","end":"2027-01-31T00:00:00+02:00"}"#)
                .unwrap();
        assert_eq!(range.start, 1_793_491_200_000);
        assert_eq!(range.end, 1_801_346_400_000);

        let json = serde_json::to_value(range).unwrap();
        assert_eq!(json["start"], "2026-11-01T00:00:00.000Z");
        assert_eq!(json["end"], "2027-01-30T22:00:00.000Z");
    }

    #[test]
    fn date_range_json_accepts_millis() {
        let range: DateRange = serde_json::from_str(r#"{"start":0,"end":86400000}"#).unwrap();
        assert_eq!(range, DateRange { start: 0, end: 86_400_000 });
    }

    #[test]
    fn slot_json_rejects_bad_time() {
        let err = serde_json::from_str::<TimeSlot>(r#"{"start":"9am","end":"12:00"}"#).unwrap_err();
        assert!(err.to_string().contains("expected zero-padded HH:MM"));
    }
}
