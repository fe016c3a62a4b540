use serde::Serialize;
use time::{Date, Duration, PrimitiveDateTime, Time};
use uuid::Uuid;

use crate::db::{AvailabilityOverride, BookedSlot, WeeklySchedule};
use crate::scheduling::conflict::has_conflict;
use crate::scheduling::windows::open_windows;

/// Parameters for one slot computation.
#[derive(Debug, Clone, Copy)]
pub struct SlotQuery {
    pub start_date: Date,
    pub end_date: Date,
    pub duration_minutes: i32,
    pub buffer_minutes: i32,
    pub appointment_type_id: Uuid,
}

/// A bookable slot. Ephemeral: computed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub appointment_type_id: Uuid,
}

/// Every bookable slot in the query's date range, chronological.
pub fn available_slots(
    schedule: &WeeklySchedule,
    overrides: &[AvailabilityOverride],
    booked: &[BookedSlot],
    query: &SlotQuery,
) -> Vec<Slot> {
    available_slots_excluding(schedule, overrides, booked, query, None)
}

/// Reschedule variant: identical, except `exclude` removes one appointment
/// from conflict detection so it does not block its own replacement slot.
///
/// Candidates step on a fixed grid from each window's start: the cursor
/// advances by duration + buffer whether or not the candidate was emitted.
/// Gaps shorter than one full step next to an existing booking therefore
/// stay unused; that trade of packing for predictability is intentional.
pub fn available_slots_excluding(
    schedule: &WeeklySchedule,
    overrides: &[AvailabilityOverride],
    booked: &[BookedSlot],
    query: &SlotQuery,
    exclude: Option<Uuid>,
) -> Vec<Slot> {
    if query.duration_minutes <= 0 {
        return Vec::new();
    }
    let duration = Duration::minutes(i64::from(query.duration_minutes));
    let step = duration + Duration::minutes(i64::from(query.buffer_minutes.max(0)));

    let mut slots = Vec::new();
    let mut date = query.start_date;
    // An inverted range never enters the loop and yields an empty list.
    while date <= query.end_date {
        for window in open_windows(schedule, date, overrides) {
            let window_end = PrimitiveDateTime::new(date, window.end);
            let mut cursor = PrimitiveDateTime::new(date, window.start);

            while cursor + duration <= window_end {
                let candidate_end = cursor + duration;
                if !has_conflict(date, cursor.time(), candidate_end.time(), booked, exclude) {
                    slots.push(Slot {
                        date,
                        start_time: cursor.time(),
                        end_time: candidate_end.time(),
                        appointment_type_id: query.appointment_type_id,
                    });
                }
                cursor = cursor + step;
            }
        }

        date = match date.next_day() {
            Some(next) => next,
            None => break,
        };
    }

    slots
}
