//! Goal endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tandem_core::{CreateGoalInput, GoalWithStats};
use tandem_common::AppResult;
use tandem_db::entities::goal;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 100;

fn clamp_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
}

/// List request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGoalsRequest {
    pub category: Option<String>,
    pub limit: Option<u64>,
}

/// List goals, pinned first.
async fn list(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListGoalsRequest>,
) -> AppResult<ApiResponse<Vec<GoalWithStats>>> {
    let limit = clamp_limit(req.limit);

    let goals = match req.category {
        Some(category) => state.goal_service.list_by_category(&category, limit).await?,
        None => state.goal_service.list(limit).await?,
    };

    Ok(ApiResponse::ok(goals))
}

/// Show request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowGoalRequest {
    pub goal_id: String,
}

/// Show a single goal with its vote statistics.
async fn show(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowGoalRequest>,
) -> AppResult<ApiResponse<GoalWithStats>> {
    let goal = state.goal_service.get_with_stats(&req.goal_id).await?;

    Ok(ApiResponse::ok(goal))
}

/// Create a goal.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGoalInput>,
) -> AppResult<ApiResponse<goal::Model>> {
    let goal = state.goal_service.create(&user.id, input).await?;

    Ok(ApiResponse::ok(goal))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", post(list))
        .route("/show", post(show))
        .route("/create", post(create))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_default() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
    }

    #[test]
    fn test_clamp_limit_capped() {
        assert_eq!(clamp_limit(Some(5000)), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(10)), 10);
    }
}
