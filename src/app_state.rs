use crate::config;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
}

impl AppState {
    pub fn new(db: PgPool, env: config::Config) -> Self {
        Self { db, env }
    }
}
