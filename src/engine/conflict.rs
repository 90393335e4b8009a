use crate::model::{Span, TimeSlot};

use super::ValidationResult;
use super::finding::Finding;

/// Sort by start, then compare neighbours. Touching slots do not overlap.
/// Slots without extent (start >= end) are skipped.
pub(crate) fn check_no_overlaps(slots: &[TimeSlot]) -> ValidationResult {
    let mut spans: Vec<Span> = slots.iter().filter_map(TimeSlot::span).collect();
    spans.sort_by_key(|s| s.start);

    spans
        .windows(2)
        .filter(|pair| pair[0].end > pair[1].start)
        .map(|pair| Finding::SlotsOverlap {
            first: pair[0],
            second: pair[1],
        })
        .collect()
}

/// Every new slot against every existing booking. Confirmed bookings are
/// errors, tentative holds are warnings.
pub(crate) fn check_booking_conflicts(new_slots: &[TimeSlot], existing: &[TimeSlot]) -> ValidationResult {
    let mut result = ValidationResult::new();
    for span in new_slots.iter().filter_map(TimeSlot::span) {
        for booking in existing {
            let Some(booked) = booking.span() else { continue };
            if !span.overlaps(&booked) {
                continue;
            }
            let job_title = booking.job_title.clone();
            if booking.is_booked {
                result.push(Finding::BookingConflict {
                    slot: span,
                    booking: booked,
                    job_title,
                });
            } else {
                result.push(Finding::TentativeConflict {
                    slot: span,
                    booking: booked,
                    job_title,
                });
            }
        }
    }
    result
}
