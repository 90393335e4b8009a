use crate::model::*;

// ── Open windows ──────────────────────────────────────────────────

/// Parts of the operating window not covered by any proposed slot.
///
/// Slots are clamped to the window and merged before subtraction, so
/// overlapping or out-of-hours slots still produce a clean, sorted result.
/// Malformed slots cover nothing.
pub fn open_windows(slots: &[TimeSlot], hours: &OperatingHours) -> Vec<Span> {
    if hours.start >= hours.end {
        return Vec::new();
    }
    let window = Span::new(hours.start, hours.end);
    let covered = covered_spans(slots, &window);
    subtract_intervals(&[window], &covered)
}

/// Minutes of the operating window covered by proposed slots, each minute
/// counted once.
pub fn available_minutes(slots: &[TimeSlot], hours: &OperatingHours) -> u32 {
    if hours.start >= hours.end {
        return 0;
    }
    let window = Span::new(hours.start, hours.end);
    covered_spans(slots, &window)
        .iter()
        .map(|s| u32::from(s.duration_minutes()))
        .sum()
}

fn covered_spans(slots: &[TimeSlot], window: &Span) -> Vec<Span> {
    let mut clamped: Vec<Span> = slots
        .iter()
        .filter_map(TimeSlot::span)
        .filter(|s| s.overlaps(window))
        .map(|s| Span::new(s.start.max(window.start), s.end.min(window.end)))
        .collect();
    clamped.sort_by_key(|s| s.start);
    merge_overlapping(&clamped)
}

/// Collapse sorted spans into disjoint ones; touching spans join.
pub fn merge_overlapping(sorted: &[Span]) -> Vec<Span> {
    sorted.iter().fold(Vec::new(), |mut merged: Vec<Span>, &span| {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
        merged
    })
}

/// Remove sorted, disjoint `to_remove` spans from sorted `base` spans.
pub fn subtract_intervals(base: &[Span], to_remove: &[Span]) -> Vec<Span> {
    let mut result = Vec::new();
    let mut pending = to_remove.iter().peekable();

    for &b in base {
        // Removals that end before this base span cannot touch later ones either.
        while pending.next_if(|r| r.end <= b.start).is_some() {}

        let mut cursor = b.start;
        for r in pending.clone().take_while(|r| r.start < b.end) {
            if r.start > cursor {
                result.push(Span::new(cursor, r.start));
            }
            cursor = cursor.max(r.end);
        }
        if cursor < b.end {
            result.push(Span::new(cursor, b.end));
        }
    }

    result
}
