use axum::{extract::Request, middleware::Next, response::Response};
use tracing::warn;

use crate::auth::{authorize, ActorContext};
use crate::error::ApiError;

/// Privilege gate for the admin router. Must run after `jwt_auth_middleware`.
pub async fn require_superuser(request: Request, next: Next) -> Result<Response, ApiError> {
    let actor = request.extensions().get::<ActorContext>();

    if let Err(denial) = authorize(actor) {
        warn!(
            user_id = ?actor.map(|a| a.user_id),
            path = %request.uri().path(),
            reason = %denial,
            "Admin request denied"
        );
        return Err(denial.into());
    }

    Ok(next.run(request).await)
}
