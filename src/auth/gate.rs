// auth/gate.rs - Privilege gate for administrative operations
//
// The gate is a pure predicate over the request's actor. It holds no state and
// is evaluated again on every request; the middleware in
// `middleware::superuser` is the only place it is wired into the router.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::Role;

/// Authenticated caller of a request, resolved fresh from the store per request.
#[derive(Debug, Clone, Serialize)]
pub struct ActorContext {
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
    pub is_superuser: bool,
}

impl ActorContext {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateDenial {
    #[error("authentication required")]
    Unauthenticated,

    #[error("role '{}' required", .0.as_str())]
    MissingRole(Role),

    #[error("superuser privileges required")]
    NotSuperuser,
}

/// Ordered checks, first failure wins:
/// authenticated, then base `user` role, then superuser flag.
pub fn authorize(actor: Option<&ActorContext>) -> Result<(), GateDenial> {
    let actor = actor.ok_or(GateDenial::Unauthenticated)?;

    if !actor.has_role(Role::User) {
        return Err(GateDenial::MissingRole(Role::User));
    }

    if !actor.is_superuser {
        return Err(GateDenial::NotSuperuser);
    }

    Ok(())
}
