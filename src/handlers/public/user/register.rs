// handlers/public/user/register.rs - POST /api/v1/users/register handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::RegisterRequest;
use crate::state::AppState;

/**
 * POST /api/v1/users/register - Create a new tenant and its owner
 *
 * Expected Input:
 * ```json
 * { "name": "string", "email": "string", "password": "string" }
 * ```
 *
 * Creates a "Home" group seeded with the starter labels and locations. The
 * new user owns the group and is never a superuser. Returns 403 when
 * registration is disabled for this deployment.
 */
pub async fn user_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(data) = payload?;
    let user = state.accounts().register(data).await?;
    Ok(ApiResponse::created(user))
}
