//! Account endpoints for the signed-in user.

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use tandem_core::{ProfileStats, UpdateUserInput};
use tandem_common::AppResult;
use tandem_db::entities::user;
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// The signed-in user, without credentials.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for MeResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            avatar_url: user.avatar_url,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Get the signed-in user's account.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<MeResponse> {
    ApiResponse::ok(user.into())
}

/// Update the signed-in user's account and profile.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<ApiResponse<MeResponse>> {
    input.validate()?;

    let updated = state.user_service.update(&user.id, input).await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Activity statistics for the signed-in user.
async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileStats>> {
    let stats = state.user_service.stats(&user.id).await?;

    Ok(ApiResponse::ok(stats))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(me))
        .route("/update", post(update))
        .route("/stats", post(stats))
}
