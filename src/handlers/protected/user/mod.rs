// handlers/protected/user/mod.rs - The caller's own account
//
// GET and DELETE on /api/v1/users/self. Self-deletion here is not subject to
// the privilege gate or the admin self-protection rules.

use axum::{extract::State, Extension};

use crate::auth::ActorContext;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/users/self
pub async fn self_get(State(state): State<AppState>, Extension(actor): Extension<ActorContext>) -> ApiResult<User> {
    let user = state.accounts().self_get(&actor).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/v1/users/self
pub async fn self_delete(State(state): State<AppState>, Extension(actor): Extension<ActorContext>) -> ApiResult<()> {
    state.accounts().self_delete(&actor).await?;
    Ok(ApiResponse::no_content())
}
