use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_appointment, get_appointment, list_appointment_types, update_appointment,
};
use crate::app_state::AppState;

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/calendars/{calendar_id}/appointment-types",
            get(list_appointment_types),
        )
        .route(
            "/calendars/{calendar_id}/appointments",
            post(create_appointment),
        )
        .route(
            "/appointments/{appointment_id}",
            get(get_appointment).patch(update_appointment),
        )
}
