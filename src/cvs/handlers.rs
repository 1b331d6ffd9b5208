use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CvFields, MessageResponse};
use super::repo_types::Cv;
use super::services;
use crate::{auth::extractors::Requester, error::AppError, extract::JsonBody, state::AppState};

pub fn cv_routes() -> Router<AppState> {
    Router::new()
        .route("/cvs", get(list_cvs).post(create_cv))
        .route("/cvs/:id", put(update_cv).delete(delete_cv))
}

/// Reachable without a token.
pub fn share_routes() -> Router<AppState> {
    Router::new().route("/cvs/share/:share_id", get(get_shared_cv))
}

#[instrument(skip(state))]
pub async fn list_cvs(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<Cv>>, AppError> {
    services::list_cvs(&state, requester).await.map(Json)
}

#[instrument(skip(state, fields))]
pub async fn create_cv(
    State(state): State<AppState>,
    requester: Requester,
    JsonBody(fields): JsonBody<CvFields>,
) -> Result<(StatusCode, Json<Cv>), AppError> {
    let cv = services::create_cv(&state, requester, fields).await?;
    Ok((StatusCode::CREATED, Json(cv)))
}

#[instrument(skip(state, fields))]
pub async fn update_cv(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<String>,
    JsonBody(fields): JsonBody<CvFields>,
) -> Result<Json<Cv>, AppError> {
    services::update_cv(&state, requester, &id, fields)
        .await
        .map(Json)
}

#[instrument(skip(state))]
pub async fn delete_cv(
    State(state): State<AppState>,
    requester: Requester,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    services::delete_cv(&state, requester, &id).await?;
    Ok(Json(MessageResponse {
        message: "CV deleted successfully",
    }))
}

#[instrument(skip(state))]
pub async fn get_shared_cv(
    State(state): State<AppState>,
    Path(share_id): Path<String>,
) -> Result<Json<Cv>, AppError> {
    services::get_by_share_id(&state, &share_id).await.map(Json)
}
