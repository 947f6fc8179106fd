//! Community question endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tandem_core::RespondInput;
use tandem_common::AppResult;
use tandem_db::entities::{question, question_response};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 100;

/// List request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuestionsRequest {
    pub limit: Option<u64>,
}

/// List questions, newest first.
async fn list(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListQuestionsRequest>,
) -> AppResult<ApiResponse<Vec<question::Model>>> {
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let questions = state.question_service.list(limit).await?;

    Ok(ApiResponse::ok(questions))
}

/// Responses request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsesRequest {
    pub question_id: String,
    pub limit: Option<u64>,
}

/// Responses to a question, newest first.
async fn responses(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ResponsesRequest>,
) -> AppResult<ApiResponse<Vec<question_response::Model>>> {
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let responses = state
        .question_service
        .responses(&req.question_id, limit)
        .await?;

    Ok(ApiResponse::ok(responses))
}

/// Respond request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub question_id: String,

    #[serde(flatten)]
    pub input: RespondInput,
}

/// Post a response to a question.
async fn respond(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>,
) -> AppResult<ApiResponse<question_response::Model>> {
    let response = state
        .question_service
        .respond(&user.id, &req.question_id, req.input)
        .await?;

    Ok(ApiResponse::ok(response))
}

/// Like request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponseRequest {
    pub response_id: String,
}

/// Like response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponseResponse {
    pub liked: bool,
}

/// Toggle a like on a question response.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeResponseRequest>,
) -> AppResult<ApiResponse<LikeResponseResponse>> {
    let liked = state
        .question_service
        .toggle_response_like(&user.id, &req.response_id)
        .await?;

    Ok(ApiResponse::ok(LikeResponseResponse { liked }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list))
        .route("/responses", post(responses))
        .route("/respond", post(respond))
        .route("/responses/like", post(like))
}
