// handlers/elevated/admin/user/superuser.rs - PUT /api/v1/admin/users/:id/superuser handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::ActorContext;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::parse_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuperuserFlag {
    pub is_superuser: bool,
}

pub async fn user_set_superuser(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
    payload: Result<Json<SuperuserFlag>, JsonRejection>,
) -> ApiResult<User> {
    let id = parse_id(&id)?;
    let Json(flag) = payload?;

    state.admin().set_superuser(&actor, id, flag.is_superuser).await?;
    let user = state.store.get_by_id(id).await?;
    Ok(ApiResponse::success(user))
}
