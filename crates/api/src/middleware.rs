//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tandem_core::{
    GoalService, HistoryService, QuestionService, ReflectionService, SubscriptionService,
    UserService, VoteService,
};
use tracing::debug;

use crate::sse::SseBroadcaster;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub goal_service: GoalService,
    pub subscription_service: SubscriptionService,
    pub vote_service: VoteService,
    pub reflection_service: ReflectionService,
    pub question_service: QuestionService,
    pub history_service: HistoryService,
    pub sse_broadcaster: SseBroadcaster,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Authenticate user by token
        match state.user_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(_) => debug!("request carried an invalid bearer token"),
        }
    }

    next.run(req).await
}
