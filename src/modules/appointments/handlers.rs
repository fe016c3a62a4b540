use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    db::{
        Appointment, AppointmentRepository, AppointmentType, CalendarRepository, NewAppointment,
        UpdateAppointmentPayload,
    },
    error::{AppError, AppResult},
};

/// GET /calendars/{calendar_id}/appointment-types
pub async fn list_appointment_types(
    State(state): State<AppState>,
    Path(calendar_id): Path<Uuid>,
) -> AppResult<Json<Vec<AppointmentType>>> {
    let calendar = CalendarRepository::get_calendar(&state.db, calendar_id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::NotFound(format!("calendar {}", calendar_id)))?;

    let appointment_types =
        CalendarRepository::list_appointment_types(&state.db, calendar.id).await?;
    Ok(Json(appointment_types))
}

/// POST /calendars/{calendar_id}/appointments
///
/// `end_time` is always derived from the appointment type's duration;
/// clients never supply it. Overlap with an existing occupying appointment
/// is rejected with 409 inside the creation transaction.
pub async fn create_appointment(
    State(state): State<AppState>,
    Path(calendar_id): Path<Uuid>,
    Json(payload): Json<NewAppointment>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let calendar = CalendarRepository::get_calendar(&state.db, calendar_id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::NotFound(format!("calendar {}", calendar_id)))?;

    let appointment_type =
        CalendarRepository::get_appointment_type(&state.db, payload.appointment_type_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| {
                AppError::NotFound(format!("appointment type {}", payload.appointment_type_id))
            })?;
    if appointment_type.calendar_id != calendar.id {
        return Err(AppError::BadRequest(
            "Appointment type does not belong to this calendar".to_string(),
        ));
    }

    let end_time = payload
        .end_time(appointment_type.duration_minutes)
        .ok_or_else(|| {
            AppError::BadRequest("Appointment must start and end on the same day".to_string())
        })?;

    let appointment =
        AppointmentRepository::create_appointment(&state.db, calendar.id, &payload, end_time)
            .await?;

    tracing::info!(
        appointment_id = %appointment.id,
        calendar_id = %calendar.id,
        date = %appointment.date,
        start_time = %appointment.start_time,
        "appointment created"
    );

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /appointments/{appointment_id}
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    let appointment = AppointmentRepository::get_appointment(&state.db, appointment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("appointment {}", appointment_id)))?;
    Ok(Json(appointment))
}

/// PATCH /appointments/{appointment_id}
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentPayload>,
) -> AppResult<Json<Appointment>> {
    let appointment = AppointmentRepository::get_appointment(&state.db, appointment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("appointment {}", appointment_id)))?;

    if !appointment.status.can_transition_to(payload.status) {
        return Err(AppError::Conflict(format!(
            "Cannot change appointment status from {:?} to {:?}",
            appointment.status, payload.status
        )));
    }

    // The repository only applies the update while the row still holds the
    // status checked above; a concurrent transition makes this come back
    // empty instead of silently overwriting it.
    let updated = AppointmentRepository::update_status(
        &state.db,
        appointment_id,
        appointment.status,
        payload.status,
    )
    .await?
    .ok_or_else(|| {
        AppError::Conflict("Appointment status changed concurrently".to_string())
    })?;

    tracing::info!(
        appointment_id = %updated.id,
        status = ?updated.status,
        "appointment status updated"
    );

    Ok(Json(updated))
}
