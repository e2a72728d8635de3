// handlers/elevated/admin/user/list.rs - GET /api/v1/admin/users handler

use axum::extract::State;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, Paginated};
use crate::state::AppState;

/// All users across every group.
pub async fn user_list(State(state): State<AppState>) -> ApiResult<Paginated<User>> {
    let users = state.admin().list_users().await?;
    Ok(ApiResponse::success(users.into()))
}
