use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::db::models::{
    AppointmentType, AvailabilityOverride, Calendar, DayScheduleRow, NewAvailabilityOverride,
    WeeklySchedule,
};
use crate::db::DatabaseError;

pub struct CalendarRepository;

impl CalendarRepository {
    pub async fn get_calendar(
        pool: &PgPool,
        calendar_id: Uuid,
    ) -> Result<Option<Calendar>, DatabaseError> {
        let calendar = sqlx::query_as::<_, Calendar>(
            r#"
            SELECT id, owner_user_id, timezone, booking_window_days, buffer_minutes,
                   is_active, created_at, updated_at
            FROM calendars
            WHERE id = $1
            "#,
        )
        .bind(calendar_id)
        .fetch_optional(pool)
        .await?;

        Ok(calendar)
    }

    pub async fn get_weekly_schedule(
        pool: &PgPool,
        calendar_id: Uuid,
    ) -> Result<WeeklySchedule, DatabaseError> {
        let rows = sqlx::query_as::<_, DayScheduleRow>(
            r#"
            SELECT weekday, enabled, start_time, end_time
            FROM calendar_day_schedules
            WHERE calendar_id = $1
            ORDER BY weekday
            "#,
        )
        .bind(calendar_id)
        .fetch_all(pool)
        .await?;

        Ok(WeeklySchedule::from_rows(&rows))
    }

    pub async fn replace_weekly_schedule(
        pool: &PgPool,
        calendar_id: Uuid,
        schedule: &WeeklySchedule,
    ) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM calendar_day_schedules WHERE calendar_id = $1")
            .bind(calendar_id)
            .execute(&mut *tx)
            .await?;

        for (weekday, day) in schedule.days().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO calendar_day_schedules (calendar_id, weekday, enabled, start_time, end_time)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(calendar_id)
            .bind(weekday as i16)
            .bind(day.enabled)
            .bind(day.start_time)
            .bind(day.end_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_overrides(
        pool: &PgPool,
        calendar_id: Uuid,
    ) -> Result<Vec<AvailabilityOverride>, DatabaseError> {
        let overrides = sqlx::query_as::<_, AvailabilityOverride>(
            r#"
            SELECT id, calendar_id, date, start_time, end_time, is_available, note, created_at
            FROM availability_overrides
            WHERE calendar_id = $1
            ORDER BY date, start_time
            "#,
        )
        .bind(calendar_id)
        .fetch_all(pool)
        .await?;

        Ok(overrides)
    }

    pub async fn overrides_in_range(
        pool: &PgPool,
        calendar_id: Uuid,
        start_date: Date,
        end_date: Date,
    ) -> Result<Vec<AvailabilityOverride>, DatabaseError> {
        let overrides = sqlx::query_as::<_, AvailabilityOverride>(
            r#"
            SELECT id, calendar_id, date, start_time, end_time, is_available, note, created_at
            FROM availability_overrides
            WHERE calendar_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date, start_time
            "#,
        )
        .bind(calendar_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(pool)
        .await?;

        Ok(overrides)
    }

    pub async fn create_override(
        pool: &PgPool,
        calendar_id: Uuid,
        data: &NewAvailabilityOverride,
    ) -> Result<AvailabilityOverride, DatabaseError> {
        let created = sqlx::query_as::<_, AvailabilityOverride>(
            r#"
            INSERT INTO availability_overrides (calendar_id, date, start_time, end_time, is_available, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, calendar_id, date, start_time, end_time, is_available, note, created_at
            "#,
        )
        .bind(calendar_id)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.is_available)
        .bind(data.note.as_deref())
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    pub async fn delete_override(
        pool: &PgPool,
        calendar_id: Uuid,
        override_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let deleted = sqlx::query_scalar::<_, Uuid>(
            r#"
            DELETE FROM availability_overrides
            WHERE id = $1 AND calendar_id = $2
            RETURNING id
            "#,
        )
        .bind(override_id)
        .bind(calendar_id)
        .fetch_optional(pool)
        .await?;

        Ok(deleted.is_some())
    }

    pub async fn get_appointment_type(
        pool: &PgPool,
        appointment_type_id: Uuid,
    ) -> Result<Option<AppointmentType>, DatabaseError> {
        let appointment_type = sqlx::query_as::<_, AppointmentType>(
            r#"
            SELECT id, calendar_id, name, duration_minutes, price_cents, is_active, created_at, updated_at
            FROM appointment_types
            WHERE id = $1
            "#,
        )
        .bind(appointment_type_id)
        .fetch_optional(pool)
        .await?;

        Ok(appointment_type)
    }

    pub async fn list_appointment_types(
        pool: &PgPool,
        calendar_id: Uuid,
    ) -> Result<Vec<AppointmentType>, DatabaseError> {
        let appointment_types = sqlx::query_as::<_, AppointmentType>(
            r#"
            SELECT id, calendar_id, name, duration_minutes, price_cents, is_active, created_at, updated_at
            FROM appointment_types
            WHERE calendar_id = $1 AND is_active = TRUE
            ORDER BY name
            "#,
        )
        .bind(calendar_id)
        .fetch_all(pool)
        .await?;

        Ok(appointment_types)
    }
}
