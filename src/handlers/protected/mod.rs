// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/v1/users/self
// Middleware: jwt_auth_middleware (inserts ActorContext)

pub mod user;

pub use user::{self_delete, self_get};
