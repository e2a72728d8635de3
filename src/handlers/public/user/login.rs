// handlers/public/user/login.rs - POST /api/v1/users/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginRequest, LoginResponse};
use crate::state::AppState;

/**
 * POST /api/v1/users/login - Exchange credentials for a bearer token
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "success": true,
 *   "data": {
 *     "token": "eyJhbGciOiJIUzI1NiI...",
 *     "expires_in": 86400,
 *     "user": { "id": "...", "email": "...", "is_superuser": false, ... }
 *   }
 * }
 * ```
 *
 * Unknown email and wrong password produce the same 401.
 */
pub async fn user_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(data) = payload?;
    let response = state.accounts().login(data).await?;
    Ok(ApiResponse::success(response))
}
