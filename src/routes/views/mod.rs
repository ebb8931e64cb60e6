use std::sync::Arc;

use askama::Template;
use axum::{Router, response::Html};

use crate::{error::AppError, state::AppState};

pub mod notes;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(notes::router())
}

/// Human-readable crate name for page titles, e.g. `sticky_notes` becomes
/// "Sticky Notes".
pub(crate) fn project_name() -> String {
    let words: Vec<String> = env!("CARGO_PKG_NAME")
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str().to_ascii_lowercase();
                    format!("{}{rest}", first.to_ascii_uppercase())
                }
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "Project".to_string()
    } else {
        words.join(" ")
    }
}

pub(crate) fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|err| AppError::internal_with_source("failed to render page", err))
}
