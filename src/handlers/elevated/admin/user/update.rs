// handlers/elevated/admin/user/update.rs - PUT /api/v1/admin/users/:id handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::auth::ActorContext;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{parse_id, AdminUserUpdate};
use crate::state::AppState;

/// Profile first, then the superuser flag. A failure between the two steps is
/// reported as `PRIVILEGE_NOT_APPLIED` so the client can retry the flag alone
/// via `PUT /api/v1/admin/users/:id/superuser`.
pub async fn user_update(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    payload: Result<Json<AdminUserUpdate>, JsonRejection>,
) -> ApiResult<User> {
    let id = parse_id(&id)?;
    let Json(data) = payload?;

    let user = state.admin().update_user(&actor, id, data).await?;
    Ok(ApiResponse::success(user))
}
