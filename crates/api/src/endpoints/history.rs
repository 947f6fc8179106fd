//! Cycle history endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tandem_core::{GoalHistory, UserOverview};
use tandem_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Goal history request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalHistoryRequest {
    pub goal_id: String,
}

/// Full cycle history for one goal.
async fn goal(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<GoalHistoryRequest>,
) -> AppResult<ApiResponse<GoalHistory>> {
    let history = state
        .history_service
        .goal_history(&user.id, &req.goal_id)
        .await?;

    Ok(ApiResponse::ok(history))
}

/// Aggregated statistics across all subscribed goals.
async fn overview(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserOverview>> {
    let overview = state.history_service.overview(&user.id).await?;

    Ok(ApiResponse::ok(overview))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/goal", post(goal))
        .route("/overview", post(overview))
}
