use time::{Date, Time};
use uuid::Uuid;

use crate::db::BookedSlot;

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`
/// conflict iff they share any instant. Touching endpoints do not conflict.
pub fn overlaps(a_start: Time, a_end: Time, b_start: Time, b_end: Time) -> bool {
    a_start < b_end && a_end > b_start
}

/// Whether a candidate window collides with any occupying booking on the
/// same date. `booked` must already be restricted to pending/confirmed
/// appointments. `exclude` removes one appointment from consideration so a
/// reschedule does not conflict with its own current slot.
pub fn has_conflict(
    date: Date,
    start: Time,
    end: Time,
    booked: &[BookedSlot],
    exclude: Option<Uuid>,
) -> bool {
    booked
        .iter()
        .filter(|b| b.date == date)
        .filter(|b| exclude != Some(b.id))
        .any(|b| overlaps(start, end, b.start_time, b.end_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn booked(id: Uuid, date: Date, start: Time, end: Time) -> BookedSlot {
        BookedSlot {
            id,
            date,
            start_time: start,
            end_time: end,
        }
    }

    const DAY: Date = date!(2026 - 09 - 07);

    #[test]
    fn overlap_predicate_half_open() {
        assert!(overlaps(time!(10:00), time!(10:30), time!(10:15), time!(10:45)));
        assert!(overlaps(time!(10:00), time!(11:00), time!(10:15), time!(10:30)));
        // Touching endpoints are free.
        assert!(!overlaps(time!(09:30), time!(10:00), time!(10:00), time!(10:30)));
        assert!(!overlaps(time!(10:30), time!(11:00), time!(10:00), time!(10:30)));
        // Disjoint.
        assert!(!overlaps(time!(08:00), time!(09:00), time!(10:00), time!(11:00)));
    }

    #[test]
    fn conflict_only_on_same_date() {
        let existing = [booked(Uuid::new_v4(), DAY, time!(10:00), time!(10:30))];
        assert!(has_conflict(DAY, time!(10:15), time!(10:45), &existing, None));
        assert!(!has_conflict(
            date!(2026 - 09 - 08),
            time!(10:15),
            time!(10:45),
            &existing,
            None
        ));
    }

    #[test]
    fn excluded_appointment_never_conflicts() {
        let id = Uuid::new_v4();
        let existing = [booked(id, DAY, time!(10:00), time!(10:30))];
        assert!(has_conflict(DAY, time!(10:00), time!(10:30), &existing, None));
        assert!(!has_conflict(
            DAY,
            time!(10:00),
            time!(10:30),
            &existing,
            Some(id)
        ));
        // A different exclusion leaves the conflict in place.
        assert!(has_conflict(
            DAY,
            time!(10:00),
            time!(10:30),
            &existing,
            Some(Uuid::new_v4())
        ));
    }
}
