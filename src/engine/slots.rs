//! Fixed-duration slot generation over disjoint free intervals.

use chrono::Duration;

use crate::model::{Slot, TimeInterval};
use crate::timemath;

/// Cut each interval into `[cursor, cursor + d)` pieces. A tail shorter
/// than the slot duration is dropped. Input intervals must be disjoint and
/// sorted, so the output is chronological with no duplicates.
pub fn slot_intervals(intervals: &[TimeInterval], slot_duration_minutes: i64) -> Vec<TimeInterval> {
    debug_assert!(slot_duration_minutes > 0, "slot duration must be positive");
    let step = Duration::minutes(slot_duration_minutes);
    let mut slots = Vec::new();
    for iv in intervals {
        let mut cursor = iv.start;
        while cursor + step <= iv.end {
            slots.push(TimeInterval::new(cursor, cursor + step));
            cursor += step;
        }
    }
    slots
}

/// The externally visible form: `HH:mm` pairs.
pub fn generate_slots(intervals: &[TimeInterval], slot_duration_minutes: i64) -> Vec<Slot> {
    slot_intervals(intervals, slot_duration_minutes)
        .iter()
        .map(|iv| Slot {
            start: timemath::extract_time(iv.start),
            end: timemath::extract_time(iv.end),
        })
        .collect()
}

/// True if `request` is exactly covered by a contiguous run of free slots:
/// it starts on a slot boundary and every slot up to its end is present.
pub fn covered_by_slots(slots: &[TimeInterval], request: &TimeInterval) -> bool {
    let Some(start_idx) = slots.iter().position(|s| s.start == request.start) else {
        return false;
    };
    let mut cursor = request.start;
    for slot in &slots[start_idx..] {
        if slot.start != cursor {
            return false; // gap in the run
        }
        cursor = slot.end;
        if cursor >= request.end {
            return cursor == request.end;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        timemath::parse_date_time("2026-03-02", &format!("{h:02}:{m:02}")).unwrap()
    }

    fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> TimeInterval {
        TimeInterval::new(t(sh, sm), t(eh, em))
    }

    #[test]
    fn short_tail_dropped() {
        let slots = generate_slots(&[iv(9, 0, 10, 5)], 60);
        assert_eq!(
            slots,
            vec![Slot {
                start: "09:00".into(),
                end: "10:00".into()
            }]
        );
    }

    #[test]
    fn exact_fit_emits_all_slots() {
        let slots = generate_slots(&[iv(9, 0, 11, 0)], 30);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].start, "09:00");
        assert_eq!(slots[3].end, "11:00");
    }

    #[test]
    fn interval_shorter_than_slot_yields_nothing() {
        assert!(generate_slots(&[iv(9, 0, 9, 45)], 60).is_empty());
    }

    #[test]
    fn slots_chronological_across_intervals() {
        let slots = generate_slots(&[iv(9, 0, 10, 0), iv(13, 0, 14, 0)], 60);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, "09:00");
        assert_eq!(slots[1].start, "13:00");
    }

    #[test]
    fn coverage_single_slot() {
        let slots = slot_intervals(&[iv(9, 0, 12, 0)], 60);
        assert!(covered_by_slots(&slots, &iv(10, 0, 11, 0)));
    }

    #[test]
    fn coverage_contiguous_run() {
        let slots = slot_intervals(&[iv(9, 0, 12, 0)], 60);
        assert!(covered_by_slots(&slots, &iv(9, 0, 12, 0)));
        assert!(covered_by_slots(&slots, &iv(10, 0, 12, 0)));
    }

    #[test]
    fn coverage_rejects_misaligned_start() {
        let slots = slot_intervals(&[iv(9, 0, 12, 0)], 60);
        assert!(!covered_by_slots(&slots, &iv(9, 30, 10, 30)));
    }

    #[test]
    fn coverage_rejects_misaligned_end() {
        let slots = slot_intervals(&[iv(9, 0, 12, 0)], 60);
        assert!(!covered_by_slots(&slots, &iv(9, 0, 10, 30)));
    }

    #[test]
    fn coverage_rejects_run_with_gap() {
        // Free 09-10 and 11-12; the 10-11 slot is taken.
        let slots = slot_intervals(&[iv(9, 0, 10, 0), iv(11, 0, 12, 0)], 60);
        assert!(!covered_by_slots(&slots, &iv(9, 0, 12, 0)));
        assert!(covered_by_slots(&slots, &iv(11, 0, 12, 0)));
    }

    #[test]
    fn coverage_rejects_past_last_slot() {
        let slots = slot_intervals(&[iv(9, 0, 11, 0)], 60);
        assert!(!covered_by_slots(&slots, &iv(10, 0, 12, 0)));
    }
}
