use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::{validate_jwt, ActorContext};
use crate::error::ApiError;
use crate::state::AppState;

/// JWT authentication middleware.
///
/// Validates the bearer token, then reloads the user so the actor carries the
/// current superuser flag rather than whatever was true at login. A token for a
/// deleted user is rejected.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(token, &state.config.security).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let user = match state.store.get_by_id(claims.sub).await {
        Ok(user) => user,
        Err(e) if e.is_not_found() => return Err(ApiError::unauthorized("Invalid or expired token")),
        Err(e) => return Err(e.into()),
    };

    let actor = ActorContext {
        user_id: user.id,
        group_id: user.group_id,
        email: user.email,
        roles: claims.roles,
        is_superuser: user.is_superuser,
    };
    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_str = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty JWT token");
    }
    Ok(token)
}
