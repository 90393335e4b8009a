use crate::model::{OperatingHours, TimeSlot};

use super::ValidationResult;
use super::finding::Finding;
use super::policy::Policy;

/// One error per slot that starts before or ends after the operating window.
/// Boundaries are inclusive.
pub(crate) fn check_operating_hours(slots: &[TimeSlot], hours: &OperatingHours) -> ValidationResult {
    slots
        .iter()
        .filter(|slot| slot.start < hours.start || slot.end > hours.end)
        .map(|slot| Finding::OutsideOperatingHours {
            slot: slot.bounds(),
            hours: *hours,
        })
        .collect()
}

pub(crate) fn check_well_formed(slots: &[TimeSlot]) -> ValidationResult {
    slots
        .iter()
        .filter(|slot| !slot.is_well_formed())
        .map(|slot| Finding::MalformedSlot { slot: slot.bounds() })
        .collect()
}

/// Inverted or empty slots are reported as malformed instead of being
/// measured. A slot draws at most one error, and the long-slot warning is
/// independent of it.
pub(crate) fn check_slot_duration(slots: &[TimeSlot], policy: &Policy) -> ValidationResult {
    let mut result = ValidationResult::new();
    for slot in slots {
        let Some(span) = slot.span() else {
            result.push(Finding::MalformedSlot { slot: slot.bounds() });
            continue;
        };
        let minutes = span.duration_minutes();
        if minutes < policy.min_slot_minutes {
            result.push(Finding::SlotTooShort {
                slot: span,
                minutes,
                min_minutes: policy.min_slot_minutes,
            });
        } else if minutes > policy.max_slot_minutes {
            result.push(Finding::SlotTooLong {
                slot: span,
                minutes,
                max_minutes: policy.max_slot_minutes,
            });
        }
        if minutes > policy.long_slot_minutes {
            result.push(Finding::LongSlot {
                slot: span,
                minutes,
                threshold_minutes: policy.long_slot_minutes,
            });
        }
    }
    result
}
