// handlers/elevated/admin/user/create.rs - POST /api/v1/admin/users handler

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};

use crate::auth::ActorContext;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AdminUserCreate;
use crate::state::AppState;

/**
 * POST /api/v1/admin/users - Create a user under administrative authority
 *
 * Expected Input:
 * ```json
 * {
 *   "name": "string",          // Required
 *   "email": "string",         // Required
 *   "password": "string",      // Required
 *   "is_superuser": false,     // Optional, defaults to false
 *   "group_id": "uuid"         // Optional, defaults to the caller's group
 * }
 * ```
 *
 * The created user is never a group owner.
 */
pub async fn user_create(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    payload: Result<Json<AdminUserCreate>, JsonRejection>,
) -> ApiResult<User> {
    let Json(data) = payload?;
    let user = state.admin().create_user(&actor, data).await?;
    Ok(ApiResponse::created(user))
}
