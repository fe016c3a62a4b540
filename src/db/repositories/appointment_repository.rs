use sqlx::PgPool;
use time::{Date, Time};
use uuid::Uuid;

use crate::db::models::{Appointment, AppointmentStatus, BookedSlot, NewAppointment};
use crate::db::DatabaseError;

const APPOINTMENT_COLUMNS: &str = "id, calendar_id, appointment_type_id, customer_name, \
     customer_email, date, start_time, end_time, status, created_at, updated_at";

pub struct AppointmentRepository;

impl AppointmentRepository {
    pub async fn get_appointment(
        pool: &PgPool,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(appointment_id)
        .fetch_optional(pool)
        .await?;

        Ok(appointment)
    }

    /// Pending and confirmed appointments in the date range, the set the
    /// slot generator must not overlap.
    pub async fn occupying_in_range(
        pool: &PgPool,
        calendar_id: Uuid,
        start_date: Date,
        end_date: Date,
    ) -> Result<Vec<BookedSlot>, DatabaseError> {
        let booked = sqlx::query_as::<_, BookedSlot>(
            r#"
            SELECT id, date, start_time, end_time
            FROM appointments
            WHERE calendar_id = $1
              AND date BETWEEN $2 AND $3
              AND status IN ('pending', 'confirmed')
            ORDER BY date, start_time
            "#,
        )
        .bind(calendar_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(pool)
        .await?;

        Ok(booked)
    }

    /// Insert a new appointment, guarding against double booking twice
    /// over: the overlap scan rejects the common case up front with a
    /// clean error, and the `appointments_no_overlap` exclusion
    /// constraint closes the remaining race. Two transactions booking the
    /// same free slot both scan zero rows (a scan of a free slot locks
    /// nothing), but only one insert can satisfy the constraint; the
    /// loser's violation is mapped back to `BookingConflict`.
    pub async fn create_appointment(
        pool: &PgPool,
        calendar_id: Uuid,
        data: &NewAppointment,
        end_time: Time,
    ) -> Result<Appointment, DatabaseError> {
        let mut tx = pool.begin().await?;

        let conflicting = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM appointments
            WHERE calendar_id = $1
              AND date = $2
              AND status IN ('pending', 'confirmed')
              AND start_time < $4
              AND end_time > $3
            FOR UPDATE
            "#,
        )
        .bind(calendar_id)
        .bind(data.date)
        .bind(data.start_time)
        .bind(end_time)
        .fetch_optional(&mut *tx)
        .await?;

        if conflicting.is_some() {
            // Dropping the transaction rolls it back.
            return Err(DatabaseError::BookingConflict);
        }

        let inserted = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointments
                (calendar_id, appointment_type_id, customer_name, customer_email, date, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(calendar_id)
        .bind(data.appointment_type_id)
        .bind(&data.customer_name)
        .bind(&data.customer_email)
        .bind(data.date)
        .bind(data.start_time)
        .bind(end_time)
        .fetch_one(&mut *tx)
        .await;

        let appointment = match inserted {
            Ok(appointment) => appointment,
            Err(err) if is_booking_conflict(&err) => return Err(DatabaseError::BookingConflict),
            Err(err) => return Err(err.into()),
        };

        tx.commit().await?;
        Ok(appointment)
    }

    /// Compare-and-swap status update: the row is written only while it
    /// still holds `expected`, so two transitions racing from the same
    /// stale status cannot both apply. `None` means the status moved
    /// underneath the caller (or the row is gone).
    pub async fn update_status(
        pool: &PgPool,
        appointment_id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, DatabaseError> {
        let updated = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointments
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(appointment_id)
        .bind(expected)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }
}

/// SQLSTATE 23P01 (exclusion_violation), raised by the
/// `appointments_no_overlap` constraint when a concurrent insert claimed
/// an overlapping window first.
fn is_booking_conflict(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23P01")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;

    #[derive(Debug)]
    struct FakePgError(&'static str);

    impl std::fmt::Display for FakePgError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "sqlstate {}", self.0)
        }
    }

    impl StdError for FakePgError {}

    impl sqlx::error::DatabaseError for FakePgError {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn exclusion_violation_maps_to_booking_conflict() {
        let err = sqlx::Error::Database(Box::new(FakePgError("23P01")));
        assert!(is_booking_conflict(&err));
    }

    #[test]
    fn other_errors_are_not_booking_conflicts() {
        let unique = sqlx::Error::Database(Box::new(FakePgError("23505")));
        assert!(!is_booking_conflict(&unique));
        assert!(!is_booking_conflict(&sqlx::Error::RowNotFound));
    }
}
