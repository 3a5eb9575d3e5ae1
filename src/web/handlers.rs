//! HTTP request handlers.

use std::collections::HashSet;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use chrono::Utc;

use super::AppState;
use crate::registry::{self, Target};
use crate::status::{build_rows, StatusRow};

/// The status page template; the presenter fills the rows, the template owns
/// all markup.
#[derive(Template)]
#[template(path = "status.html")]
struct StatusTemplate {
    rows: Vec<StatusRow>,
}

/// `GET /status` — render the latest result per target, in configured order.
pub async fn handle_status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    let rows = build_rows(snapshot, Utc::now());

    let page = StatusTemplate { rows };
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("can't render status page: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// `GET /reload` — re-read the requests file and swap in the new target list.
///
/// On failure the previously loaded targets stay active and the error text is
/// returned with a 500.
pub async fn handle_reload(State(state): State<AppState>) -> impl IntoResponse {
    match registry::load_targets(&state.requests_path) {
        Ok(list) => {
            let count = list.len();
            let keys: HashSet<String> = list.iter().map(Target::key).collect();
            {
                let mut targets = state.targets.write().await;
                *targets = list;
            }
            state.store.retain(&keys).await;

            tracing::info!(
                "Reloaded {} targets from {}",
                count,
                state.requests_path.display()
            );
            "Done".into_response()
        }
        Err(e) => {
            tracing::error!("Reload failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
