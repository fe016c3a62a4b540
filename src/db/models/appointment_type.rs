use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AppointmentType {
    pub id: Uuid,
    pub calendar_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: Option<i64>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
