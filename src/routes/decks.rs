//! Raw access to the three deck files, plus the backup export.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::engine::{ArchivedItem, Item, Metadata};
use crate::response::{ok, AppError};
use crate::services::learning;
use crate::state::AppState;
use crate::store::WordFile;

#[derive(Serialize)]
pub struct SavedWords {
    words: usize,
}

pub async fn get_active(
    State(state): State<AppState>,
    Path(deck): Path<String>,
) -> Result<Json<WordFile<Item>>, AppError> {
    Ok(Json(state.store().load_active(&deck).await?))
}

pub async fn save_active(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    Json(file): Json<WordFile<Item>>,
) -> Result<impl IntoResponse, AppError> {
    let words = learning::replace_active(&state, &deck, file).await?;
    Ok(ok(SavedWords { words }))
}

pub async fn get_archived(
    State(state): State<AppState>,
    Path(deck): Path<String>,
) -> Result<Json<WordFile<ArchivedItem>>, AppError> {
    Ok(Json(state.store().load_archived(&deck).await?))
}

pub async fn save_archived(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    Json(file): Json<WordFile<ArchivedItem>>,
) -> Result<impl IntoResponse, AppError> {
    let words = learning::replace_archived(&state, &deck, file).await?;
    Ok(ok(SavedWords { words }))
}

pub async fn get_metadata(
    State(state): State<AppState>,
    Path(deck): Path<String>,
) -> Result<Json<Metadata>, AppError> {
    Ok(Json(state.store().load_metadata(&deck).await?))
}

pub async fn save_metadata(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    Json(metadata): Json<Metadata>,
) -> Result<impl IntoResponse, AppError> {
    if metadata.settings.unarchive_failure_threshold == 0 {
        return Err(AppError::validation(
            "unarchiveFailureThreshold must be at least 1",
        ));
    }
    learning::replace_metadata(&state, &deck, metadata).await?;
    Ok(ok(()))
}

pub async fn export(
    State(state): State<AppState>,
    Path(deck): Path<String>,
) -> Result<Response, AppError> {
    let bundle = state.store().export(&deck).await?;
    let filename = format!(
        "attachment; filename=\"{deck}-backup-{}.json\"",
        bundle.export_date.format("%Y-%m-%d")
    );

    tracing::info!(deck = %deck, "deck exported");
    Ok(([(header::CONTENT_DISPOSITION, filename)], Json(bundle)).into_response())
}
