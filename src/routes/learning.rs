use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::engine::{Language, SessionMode};
use crate::response::{ok, AppError};
use crate::services::{archive, learning};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    mode: SessionMode,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRequest {
    word_id: u64,
    correct: bool,
    #[serde(default, alias = "responseTimeMs")]
    ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveReviewRequest {
    word_id: u64,
    correct: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    word_id: u64,
    answer: String,
    #[serde(default)]
    language: Option<Language>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRequest {
    results: Vec<bool>,
    #[serde(default)]
    duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRequest {
    word_id: u64,
}

#[derive(Serialize)]
struct CheckResponse {
    correct: bool,
}

#[derive(Serialize)]
struct ArchiveResponse {
    success: bool,
    archived: usize,
}

#[derive(Serialize)]
struct UnarchiveResponse {
    unarchived: bool,
}

pub async fn stats(
    State(state): State<AppState>,
    Path(deck): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(learning::deck_stats(&state, &deck).await?))
}

pub async fn start_session(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    axum::Json(req): axum::Json<SessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.count == Some(0) {
        return Err(AppError::validation("count must be at least 1"));
    }
    let session = learning::start_session(&state, &deck, req.mode, req.count).await?;
    Ok(ok(session))
}

pub async fn record_attempt(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    axum::Json(req): axum::Json<AttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = learning::record_attempt(&state, &deck, req.word_id, req.correct, req.ms).await?;
    Ok(ok(outcome))
}

pub async fn record_archive_review(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    axum::Json(req): axum::Json<ArchiveReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = learning::record_archive_review(&state, &deck, req.word_id, req.correct).await?;
    Ok(ok(outcome))
}

pub async fn check_answer(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    axum::Json(req): axum::Json<CheckRequest>,
) -> Result<impl IntoResponse, AppError> {
    let correct =
        learning::check_answer(&state, &deck, req.word_id, &req.answer, req.language).await?;
    Ok(ok(CheckResponse { correct }))
}

pub async fn finish_session(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    axum::Json(req): axum::Json<FinishRequest>,
) -> Result<impl IntoResponse, AppError> {
    let finished = learning::finish_session(&state, &deck, &req.results, req.duration_ms).await?;
    Ok(ok(finished))
}

pub async fn run_archive(
    State(state): State<AppState>,
    Path(deck): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let archived = archive::run_archive_process(&state, &deck).await?;
    Ok(axum::Json(ArchiveResponse {
        success: true,
        archived,
    }))
}

pub async fn unarchive(
    State(state): State<AppState>,
    Path(deck): Path<String>,
    axum::Json(req): axum::Json<WordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let unarchived = archive::unarchive_word(&state, &deck, req.word_id).await?;
    Ok(ok(UnarchiveResponse { unarchived }))
}
