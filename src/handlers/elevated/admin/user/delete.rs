// handlers/elevated/admin/user/delete.rs - DELETE /api/v1/admin/users/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use crate::auth::ActorContext;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::parse_id;
use crate::state::AppState;

pub async fn user_delete(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    state.admin().delete_user(&actor, id).await?;
    Ok(ApiResponse::no_content())
}
