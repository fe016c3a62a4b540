use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime, Time};
use validator::Validate;

/// A date-specific exception to the weekly schedule. The presence of any
/// override row for a date disables the weekly default for that date;
/// only rows with `is_available = true` contribute open windows.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AvailabilityOverride {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub is_available: bool,
    pub note: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAvailabilityOverride {
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub is_available: bool,
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}
