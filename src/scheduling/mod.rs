//! Availability computation for a calendar: pure functions over the weekly
//! schedule, date-specific overrides and existing bookings. No I/O happens
//! here; callers fetch the inputs and pass them in, which keeps the whole
//! module deterministic and testable.

mod conflict;
mod slots;
mod windows;

pub use conflict::{has_conflict, overlaps};
pub use slots::{available_slots, available_slots_excluding, Slot, SlotQuery};
pub use windows::{open_windows, weekly_window, OpenWindow};
