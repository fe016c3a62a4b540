use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    db::{
        AppointmentRepository, AvailabilityOverride, Calendar, CalendarRepository,
        NewAvailabilityOverride, WeeklySchedule,
    },
    error::{AppError, AppResult},
    scheduling::{available_slots_excluding, Slot, SlotQuery},
};

#[derive(Debug, Deserialize)]
pub struct SlotsParams {
    pub appointment_type_id: Uuid,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// GET /calendars/{calendar_id}/slots
pub async fn list_available_slots(
    State(state): State<AppState>,
    Path(calendar_id): Path<Uuid>,
    Query(params): Query<SlotsParams>,
) -> AppResult<Json<Vec<Slot>>> {
    compute_slots(&state, calendar_id, params, None).await
}

/// GET /calendars/{calendar_id}/appointments/{appointment_id}/reschedule-slots
///
/// Same computation, but the named appointment is excluded from conflict
/// detection so its current slot does not block the reschedule.
pub async fn list_reschedule_slots(
    State(state): State<AppState>,
    Path((calendar_id, appointment_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<SlotsParams>,
) -> AppResult<Json<Vec<Slot>>> {
    let appointment = AppointmentRepository::get_appointment(&state.db, appointment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("appointment {}", appointment_id)))?;
    if appointment.calendar_id != calendar_id {
        return Err(AppError::NotFound(format!("appointment {}", appointment_id)));
    }

    compute_slots(&state, calendar_id, params, Some(appointment_id)).await
}

async fn compute_slots(
    state: &AppState,
    calendar_id: Uuid,
    params: SlotsParams,
    exclude: Option<Uuid>,
) -> AppResult<Json<Vec<Slot>>> {
    let calendar = active_calendar(state, calendar_id).await?;

    let appointment_type =
        CalendarRepository::get_appointment_type(&state.db, params.appointment_type_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| {
                AppError::NotFound(format!("appointment type {}", params.appointment_type_id))
            })?;
    if appointment_type.calendar_id != calendar.id {
        return Err(AppError::BadRequest(
            "Appointment type does not belong to this calendar".to_string(),
        ));
    }

    let Some((start_date, end_date)) = resolve_date_range(
        params.start_date,
        params.end_date,
        OffsetDateTime::now_utc().date(),
        calendar.booking_window_days,
    ) else {
        return Ok(Json(Vec::new()));
    };

    let schedule = CalendarRepository::get_weekly_schedule(&state.db, calendar.id).await?;
    let overrides =
        CalendarRepository::overrides_in_range(&state.db, calendar.id, start_date, end_date)
            .await?;
    let booked =
        AppointmentRepository::occupying_in_range(&state.db, calendar.id, start_date, end_date)
            .await?;

    let query = SlotQuery {
        start_date,
        end_date,
        duration_minutes: appointment_type.duration_minutes,
        buffer_minutes: calendar.buffer_minutes,
        appointment_type_id: appointment_type.id,
    };
    let slots = available_slots_excluding(&schedule, &overrides, &booked, &query, exclude);

    tracing::debug!(
        calendar_id = %calendar.id,
        appointment_type_id = %appointment_type.id,
        %start_date,
        %end_date,
        count = slots.len(),
        "computed available slots"
    );

    Ok(Json(slots))
}

/// GET /calendars/{calendar_id}/schedule
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(calendar_id): Path<Uuid>,
) -> AppResult<Json<WeeklySchedule>> {
    let calendar = active_calendar(&state, calendar_id).await?;
    let schedule = CalendarRepository::get_weekly_schedule(&state.db, calendar.id).await?;
    Ok(Json(schedule))
}

/// PUT /calendars/{calendar_id}/schedule
pub async fn put_schedule(
    State(state): State<AppState>,
    Path(calendar_id): Path<Uuid>,
    Json(schedule): Json<WeeklySchedule>,
) -> AppResult<Json<WeeklySchedule>> {
    let calendar = active_calendar(&state, calendar_id).await?;
    schedule.validate_windows().map_err(AppError::Validation)?;

    CalendarRepository::replace_weekly_schedule(&state.db, calendar.id, &schedule).await?;
    Ok(Json(schedule))
}

/// GET /calendars/{calendar_id}/overrides
pub async fn list_overrides(
    State(state): State<AppState>,
    Path(calendar_id): Path<Uuid>,
) -> AppResult<Json<Vec<AvailabilityOverride>>> {
    let calendar = active_calendar(&state, calendar_id).await?;
    let overrides = CalendarRepository::list_overrides(&state.db, calendar.id).await?;
    Ok(Json(overrides))
}

/// POST /calendars/{calendar_id}/overrides
pub async fn create_override(
    State(state): State<AppState>,
    Path(calendar_id): Path<Uuid>,
    Json(payload): Json<NewAvailabilityOverride>,
) -> AppResult<(StatusCode, Json<AvailabilityOverride>)> {
    let calendar = active_calendar(&state, calendar_id).await?;

    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if payload.start_time >= payload.end_time {
        return Err(AppError::Validation(
            "Override start_time must be before end_time".to_string(),
        ));
    }

    let created = CalendarRepository::create_override(&state.db, calendar.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /calendars/{calendar_id}/overrides/{override_id}
pub async fn delete_override(
    State(state): State<AppState>,
    Path((calendar_id, override_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let calendar = active_calendar(&state, calendar_id).await?;

    if CalendarRepository::delete_override(&state.db, calendar.id, override_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("override {}", override_id)))
    }
}

async fn active_calendar(state: &AppState, calendar_id: Uuid) -> AppResult<Calendar> {
    CalendarRepository::get_calendar(&state.db, calendar_id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::NotFound(format!("calendar {}", calendar_id)))
}

/// Date range for a slot query: explicit parameters win, otherwise today
/// through today + booking window. `None` means the range is inverted,
/// which the endpoint answers with an empty list rather than an error.
fn resolve_date_range(
    start_param: Option<Date>,
    end_param: Option<Date>,
    today: Date,
    booking_window_days: i32,
) -> Option<(Date, Date)> {
    let start_date = start_param.unwrap_or(today);
    let end_date = end_param.unwrap_or_else(|| {
        start_date
            .checked_add(Duration::days(i64::from(booking_window_days)))
            .unwrap_or(start_date)
    });
    (start_date <= end_date).then_some((start_date, end_date))
}
