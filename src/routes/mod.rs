mod decks;
mod health;
mod learning;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/:deck/active",
            get(decks::get_active).post(decks::save_active),
        )
        .route(
            "/api/:deck/archived",
            get(decks::get_archived).post(decks::save_archived),
        )
        .route(
            "/api/:deck/metadata",
            get(decks::get_metadata).post(decks::save_metadata),
        )
        .route("/api/:deck/export", get(decks::export))
        .route("/api/:deck/stats", get(learning::stats))
        .route("/api/:deck/session", post(learning::start_session))
        .route("/api/:deck/session/finish", post(learning::finish_session))
        .route("/api/:deck/attempts", post(learning::record_attempt))
        .route("/api/:deck/archive-review", post(learning::record_archive_review))
        .route("/api/:deck/check", post(learning::check_answer))
        .route("/api/:deck/archive", post(learning::run_archive))
        .route("/api/:deck/unarchive", post(learning::unarchive))
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    AppError::not_found("route not found").into_response()
}
