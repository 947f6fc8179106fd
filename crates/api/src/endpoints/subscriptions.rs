//! Subscription endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tandem_core::{JoinGoalInput, RenewCycleInput};
use tandem_common::AppResult;
use tandem_db::entities::{cycle_renewal, subscription};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
    sse::SseEvent,
};

/// Join request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub goal_id: String,

    #[serde(flatten)]
    pub input: JoinGoalInput,
}

/// Join a goal.
async fn join(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<JoinRequest>,
) -> AppResult<ApiResponse<subscription::Model>> {
    let subscription = state
        .subscription_service
        .join(&user.id, &req.goal_id, req.input)
        .await?;

    state
        .sse_broadcaster
        .broadcast_to_goal(
            &req.goal_id,
            SseEvent::SubscriberJoined {
                goal_id: req.goal_id.clone(),
                user_id: user.id,
            },
        )
        .await;

    Ok(ApiResponse::ok(subscription))
}

/// The signed-in user's subscriptions, most recent first.
async fn my(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<subscription::Model>>> {
    let subscriptions = state.subscription_service.my_subscriptions(&user.id).await?;

    Ok(ApiResponse::ok(subscriptions))
}

/// Request targeting one subscription.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub subscription_id: String,
}

/// Pause a subscription.
async fn pause(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubscriptionRequest>,
) -> AppResult<ApiResponse<subscription::Model>> {
    let subscription = state
        .subscription_service
        .pause(&user.id, &req.subscription_id)
        .await?;

    Ok(ApiResponse::ok(subscription))
}

/// Resume a paused subscription.
async fn resume(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubscriptionRequest>,
) -> AppResult<ApiResponse<subscription::Model>> {
    let subscription = state
        .subscription_service
        .resume(&user.id, &req.subscription_id)
        .await?;

    Ok(ApiResponse::ok(subscription))
}

/// Finish a subscription for good.
async fn finish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubscriptionRequest>,
) -> AppResult<ApiResponse<subscription::Model>> {
    let subscription = state
        .subscription_service
        .finish(&user.id, &req.subscription_id)
        .await?;

    Ok(ApiResponse::ok(subscription))
}

/// Renew request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewRequest {
    pub subscription_id: String,

    #[serde(flatten)]
    pub input: RenewCycleInput,
}

/// Start the next cycle of a subscription.
async fn renew(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<RenewRequest>,
) -> AppResult<ApiResponse<subscription::Model>> {
    let subscription = state
        .subscription_service
        .renew(&user.id, &req.subscription_id, req.input)
        .await?;

    Ok(ApiResponse::ok(subscription))
}

/// Renewal history for a subscription.
async fn renewals(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubscriptionRequest>,
) -> AppResult<ApiResponse<Vec<cycle_renewal::Model>>> {
    let renewals = state
        .subscription_service
        .renewals(&user.id, &req.subscription_id)
        .await?;

    Ok(ApiResponse::ok(renewals))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/join", post(join))
        .route("/my", post(my))
        .route("/pause", post(pause))
        .route("/resume", post(resume))
        .route("/finish", post(finish))
        .route("/renew", post(renew))
        .route("/renewals", post(renewals))
}
