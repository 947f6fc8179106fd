//! API endpoints.

mod auth;
mod goals;
mod history;
mod questions;
mod reflections;
mod subscriptions;
mod users;
mod votes;

use axum::Router;

use crate::middleware::AppState;
use crate::sse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/i", users::router())
        .nest("/goals", goals::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/votes", votes::router())
        .nest("/reflections", reflections::router())
        .nest("/history", history::router())
        .nest("/questions", questions::router())
        .nest("/streaming/sse", sse::router())
}
