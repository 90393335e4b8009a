mod availability;
mod calendar;
mod clock;
mod conflict;
mod finding;
mod policy;
mod result;
mod slots;
mod temporal;

pub use availability::{available_minutes, merge_overlapping, open_windows, subtract_intervals};
pub use calendar::{DAY_MS, HOUR_MS, add_months, start_of_day};
pub use clock::{Clock, FixedClock, SystemClock};
pub use finding::{Finding, Severity};
pub use policy::Policy;
pub use result::{RenderedResult, StructuredResult, ValidationResult};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::*;
use crate::observability;

/// Everything needed to decide whether a day's slots may be committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    /// The day being edited, carrying the intended time of day for the
    /// lead-time check.
    #[serde(with = "rfc3339")]
    pub date: Ms,
    pub slots: Vec<TimeSlot>,
    pub operating_hours: OperatingHours,
    #[serde(default)]
    pub existing_bookings: Vec<TimeSlot>,
    /// Falls back to the policy default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_hours: Option<u32>,
}

/// Stateless validation engine. Holds only configuration and a clock, so a
/// single instance can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Validator<C: Clock = SystemClock> {
    policy: Policy,
    clock: C,
}

impl Validator<SystemClock> {
    pub fn new(policy: Policy) -> Self {
        Self::with_clock(policy, SystemClock)
    }
}

impl Default for Validator<SystemClock> {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

impl<C: Clock> Validator<C> {
    pub fn with_clock(policy: Policy, clock: C) -> Self {
        Self { policy, clock }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn validate_not_past_date(&self, date: Ms) -> ValidationResult {
        let now = self.clock.now_ms();
        observe(
            "not_past_date",
            temporal::check_not_past_date(date, now, self.policy.utc_offset),
        )
    }

    pub fn validate_date_range(&self, range: &DateRange) -> ValidationResult {
        let now = self.clock.now_ms();
        observe(
            "date_range",
            temporal::check_date_range(range, now, self.policy.max_range_months, self.policy.utc_offset),
        )
    }

    pub fn validate_operating_hours(&self, slots: &[TimeSlot], hours: &OperatingHours) -> ValidationResult {
        observe("operating_hours", slots::check_operating_hours(slots, hours))
    }

    pub fn validate_well_formed(&self, slots: &[TimeSlot]) -> ValidationResult {
        observe("well_formed", slots::check_well_formed(slots))
    }

    pub fn validate_slot_duration(&self, slots: &[TimeSlot]) -> ValidationResult {
        observe("slot_duration", slots::check_slot_duration(slots, &self.policy))
    }

    pub fn validate_no_overlaps(&self, slots: &[TimeSlot]) -> ValidationResult {
        observe("no_overlaps", conflict::check_no_overlaps(slots))
    }

    pub fn validate_booking_conflicts(
        &self,
        new_slots: &[TimeSlot],
        existing_bookings: &[TimeSlot],
    ) -> ValidationResult {
        observe(
            "booking_conflicts",
            conflict::check_booking_conflicts(new_slots, existing_bookings),
        )
    }

    /// `lead_time_hours` defaults to the policy's lead time.
    pub fn validate_lead_time(&self, date: Ms, lead_time_hours: Option<u32>) -> ValidationResult {
        let now = self.clock.now_ms();
        let hours = lead_time_hours.unwrap_or(self.policy.default_lead_time_hours);
        observe("lead_time", temporal::check_lead_time(date, now, hours))
    }

    /// Run every per-day check without short-circuiting and combine the
    /// findings. The date-range check is not part of this; it applies to
    /// multi-day spans.
    pub fn validate_availability_update(&self, update: &AvailabilityUpdate) -> ValidationResult {
        let started = std::time::Instant::now();
        // One reading of "now" for both time-dependent checks.
        let now = self.clock.now_ms();
        let lead_time_hours = update
            .lead_time_hours
            .unwrap_or(self.policy.default_lead_time_hours);

        let mut result = ValidationResult::new();
        result.merge(observe(
            "not_past_date",
            temporal::check_not_past_date(update.date, now, self.policy.utc_offset),
        ));
        result.merge(self.validate_operating_hours(&update.slots, &update.operating_hours));
        result.merge(self.validate_slot_duration(&update.slots));
        result.merge(self.validate_no_overlaps(&update.slots));
        result.merge(self.validate_booking_conflicts(&update.slots, &update.existing_bookings));
        result.merge(observe(
            "lead_time",
            temporal::check_lead_time(update.date, now, lead_time_hours),
        ));

        metrics::histogram!(observability::VALIDATION_DURATION_SECONDS, "check" => "availability_update")
            .record(started.elapsed().as_secs_f64());
        info!(
            slots = update.slots.len(),
            bookings = update.existing_bookings.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            valid = result.is_valid(),
            "availability update validated"
        );
        observability::record_outcome("availability_update", &result);
        result
    }
}

fn observe(check: &'static str, result: ValidationResult) -> ValidationResult {
    debug!(
        check,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "check finished"
    );
    observability::record_outcome(check, &result);
    observability::record_findings(&result);
    result
}

/// RFC 3339 on the wire, Unix milliseconds in memory. Integer millis are
/// accepted on input too.
pub(crate) mod rfc3339 {
    use chrono::{DateTime, SecondsFormat};
    use serde::{Deserialize, Deserializer, Serializer, de};

    use crate::model::Ms;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Instant {
        Text(String),
        Millis(Ms),
    }

    pub fn serialize<S: Serializer>(at: &Ms, serializer: S) -> Result<S::Ok, S::Error> {
        match DateTime::from_timestamp_millis(*at) {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_i64(*at),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Ms, D::Error> {
        match Instant::deserialize(deserializer)? {
            Instant::Millis(at) => Ok(at),
            Instant::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.timestamp_millis())
                .map_err(|e| de::Error::custom(format!("invalid date {s:?}: {e}"))),
        }
    }
}
