use axum::{
    routing::{delete, get},
    Router,
};

use super::handlers::{
    create_override, delete_override, get_schedule, list_available_slots, list_overrides,
    list_reschedule_slots, put_schedule,
};
use crate::app_state::AppState;

pub fn availability_routes() -> Router<AppState> {
    Router::new()
        .route("/calendars/{calendar_id}/slots", get(list_available_slots))
        .route(
            "/calendars/{calendar_id}/appointments/{appointment_id}/reschedule-slots",
            get(list_reschedule_slots),
        )
        .route(
            "/calendars/{calendar_id}/schedule",
            get(get_schedule).put(put_schedule),
        )
        .route(
            "/calendars/{calendar_id}/overrides",
            get(list_overrides).post(create_override),
        )
        .route(
            "/calendars/{calendar_id}/overrides/{override_id}",
            delete(delete_override),
        )
}
