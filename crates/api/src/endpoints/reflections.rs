//! Reflection endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tandem_core::PostReflectionInput;
use tandem_common::AppResult;
use tandem_db::entities::reflection;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
    sse::SseEvent,
};

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 100;

/// Create request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReflectionRequest {
    pub goal_id: String,

    #[serde(flatten)]
    pub input: PostReflectionInput,
}

/// Post a reflection on a goal.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReflectionRequest>,
) -> AppResult<ApiResponse<reflection::Model>> {
    let reflection = state
        .reflection_service
        .post(&user.id, &req.goal_id, req.input)
        .await?;

    state
        .sse_broadcaster
        .broadcast_to_goal(
            &req.goal_id,
            SseEvent::ReflectionPosted {
                goal_id: req.goal_id.clone(),
                reflection_id: reflection.id.clone(),
                user_id: user.id,
            },
        )
        .await;

    Ok(ApiResponse::ok(reflection))
}

/// List request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReflectionsRequest {
    pub goal_id: String,
    pub limit: Option<u64>,
}

/// Reflections on a goal, newest first.
async fn list(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListReflectionsRequest>,
) -> AppResult<ApiResponse<Vec<reflection::Model>>> {
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let reflections = state.reflection_service.list_by_goal(&req.goal_id, limit).await?;

    Ok(ApiResponse::ok(reflections))
}

/// Like request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeReflectionRequest {
    pub reflection_id: String,
}

/// Like response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeReflectionResponse {
    pub liked: bool,
}

/// Toggle a like on a reflection.
async fn like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeReflectionRequest>,
) -> AppResult<ApiResponse<LikeReflectionResponse>> {
    let reflection = state.reflection_service.get(&req.reflection_id).await?;
    let liked = state
        .reflection_service
        .toggle_like(&user.id, &req.reflection_id)
        .await?;

    state
        .sse_broadcaster
        .broadcast_to_goal(
            &reflection.goal_id,
            SseEvent::ReflectionLiked {
                goal_id: reflection.goal_id.clone(),
                reflection_id: req.reflection_id,
                user_id: user.id,
                liked,
            },
        )
        .await;

    Ok(ApiResponse::ok(LikeReflectionResponse { liked }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
        .route("/like", post(like))
}
