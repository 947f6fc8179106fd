//! Daily vote endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tandem_core::{history::BoardDay, CastVoteInput};
use tandem_common::AppResult;
use tandem_db::entities::vote::{self, VoteAnswer};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
    sse::SseEvent,
};

/// Cast request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastRequest {
    pub goal_id: String,

    #[serde(flatten)]
    pub input: CastVoteInput,
}

/// Cast today's vote on a goal.
async fn cast(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CastRequest>,
) -> AppResult<ApiResponse<vote::Model>> {
    let result = state
        .vote_service
        .cast(&user.id, &req.goal_id, req.input)
        .await?;

    state
        .sse_broadcaster
        .broadcast_to_goal(
            &req.goal_id,
            SseEvent::VoteCast {
                goal_id: req.goal_id.clone(),
                user_id: user.id.clone(),
                answer: match result.vote.answer {
                    VoteAnswer::Yes => "yes".to_string(),
                    VoteAnswer::No => "no".to_string(),
                },
                date: result.vote.date.to_string(),
            },
        )
        .await;

    if let Some(reflection) = &result.reflection {
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
    }

    Ok(ApiResponse::ok(result.vote))
}

/// Request targeting one goal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRequest {
    pub goal_id: String,
}

/// Today's vote on a goal, if cast.
async fn today(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<GoalRequest>,
) -> AppResult<ApiResponse<Option<vote::Model>>> {
    let vote = state.vote_service.today_vote(&user.id, &req.goal_id).await?;

    Ok(ApiResponse::ok(vote))
}

/// Cycle request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRequest {
    pub goal_id: String,
    pub cycle_number: i32,
}

/// Votes cast within one cycle, oldest first.
async fn cycle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CycleRequest>,
) -> AppResult<ApiResponse<Vec<vote::Model>>> {
    let votes = state
        .vote_service
        .votes_for_cycle(&user.id, &req.goal_id, req.cycle_number)
        .await?;

    Ok(ApiResponse::ok(votes))
}

/// The current cycle's vote board, future days masked.
async fn board(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<GoalRequest>,
) -> AppResult<ApiResponse<Vec<BoardDay>>> {
    let board = state.vote_service.board(&user.id, &req.goal_id).await?;

    Ok(ApiResponse::ok(board))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cast", post(cast))
        .route("/today", post(today))
        .route("/cycle", post(cycle))
        .route("/board", post(board))
}
