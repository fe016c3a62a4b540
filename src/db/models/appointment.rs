use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl AppointmentStatus {
    /// Only pending and confirmed appointments occupy time for conflict
    /// detection; the other statuses never block a slot. The repository
    /// queries mirror this pair in their status filters.
    #[allow(unused)]
    pub fn is_occupying(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled | Self::Completed | Self::NoShow)
        )
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub appointment_type_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub status: AppointmentStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Projection of an occupying appointment used by the slot generator.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookedSlot {
    pub id: Uuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAppointment {
    pub appointment_type_id: Uuid,
    pub date: Date,
    pub start_time: Time,
    #[validate(length(min = 1, max = 200, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "Customer email must be a valid address"))]
    pub customer_email: String,
}

impl NewAppointment {
    /// End time derived from the appointment type's duration. `None` when
    /// the appointment would cross midnight, which is never bookable.
    pub fn end_time(&self, duration_minutes: i32) -> Option<Time> {
        let start = PrimitiveDateTime::new(self.date, self.start_time);
        let end = start + Duration::minutes(i64::from(duration_minutes));
        (end.date() == self.date && end.time() > self.start_time).then(|| end.time())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentPayload {
    pub status: AppointmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn new_appointment(start: Time) -> NewAppointment {
        NewAppointment {
            appointment_type_id: Uuid::nil(),
            date: date!(2026 - 09 - 07),
            start_time: start,
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
        }
    }

    #[test]
    fn end_time_is_start_plus_duration() {
        let payload = new_appointment(time!(10:00));
        assert_eq!(payload.end_time(45), Some(time!(10:45)));
    }

    #[test]
    fn end_time_rejects_midnight_crossing() {
        let payload = new_appointment(time!(23:45));
        assert_eq!(payload.end_time(30), None);
    }

    #[test]
    fn occupying_statuses() {
        assert!(AppointmentStatus::Pending.is_occupying());
        assert!(AppointmentStatus::Confirmed.is_occupying());
        assert!(!AppointmentStatus::Cancelled.is_occupying());
        assert!(!AppointmentStatus::Completed.is_occupying());
        assert!(!AppointmentStatus::NoShow.is_occupying());
    }

    #[test]
    fn status_transitions() {
        use AppointmentStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Pending));
    }

    #[test]
    fn no_status_transitions_to_itself() {
        use AppointmentStatus::*;
        // Replaying the same transition must fail the check, so of two
        // identical concurrent updates at most one can apply.
        for status in [Pending, Confirmed, Cancelled, Completed, NoShow] {
            assert!(!status.can_transition_to(status));
        }
    }
}
