use std::sync::Arc;

use axum::Router;

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    middleware::catch_panic_layer,
    routes::router,
    state::AppState,
};

/// Fresh in-memory sqlite database with the schema synced and topics seeded.
///
/// The pool holds exactly one connection so every query sees the same
/// in-memory database.
pub async fn test_state() -> Arc<AppState> {
    test_state_with(DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
    })
    .await
}

pub async fn test_state_with(database: DatabaseConfig) -> Arc<AppState> {
    let mut cfg = AppConfig::default();
    cfg.database = database;
    let db = connection::connect(&cfg.database)
        .await
        .expect("connect to test database");
    AppState::new(cfg, db)
}

pub fn test_router(state: Arc<AppState>) -> Router {
    router(state).layer(catch_panic_layer())
}
