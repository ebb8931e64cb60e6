use std::{path::PathBuf, sync::Arc};

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

use super::views;

pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = resolve_public_dir(&state.config.general.public_dir);
    Router::new()
        .merge(views::router())
        .nest_service("/static", ServeDir::new(public_dir))
        .with_state(state)
}

fn resolve_public_dir(configured: &str) -> PathBuf {
    let path = PathBuf::from(configured);
    if path.is_absolute() || path.exists() {
        return path;
    }

    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let candidate = exe_dir.join(&path);
        if candidate.exists() {
            return candidate;
        }
    }

    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(path)
}
