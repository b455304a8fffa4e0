use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::jwt::SessionKeys;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub session_keys: SessionKeys,
}

impl AppState {
    /// Builds the state with a freshly generated session signing key.
    pub fn new(db_pool: SqlitePool, config: AppConfig) -> Self {
        Self {
            db_pool,
            config: Arc::new(config),
            session_keys: SessionKeys::generate(),
        }
    }
}
