use crate::domain::MeasureCatalog;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub measures: Arc<MeasureCatalog>,
}
