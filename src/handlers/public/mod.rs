// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Route Prefix: /health, /api/v1/users/{register,login}
// Middleware: None
//
// These are the entry points for token acquisition, so every input is
// untrusted and validated by the account service.

pub mod health;
pub mod user;

pub use health::health;
pub use user::*;
