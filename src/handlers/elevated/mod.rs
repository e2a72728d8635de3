// handlers/elevated/mod.rs - Elevated handlers (superuser required)
//
// Security Level: JWT authentication + privilege gate
// Route Prefix: /api/v1/admin/*
// Middleware: jwt_auth_middleware, then require_superuser
//
// The gate re-checks the superuser flag on every request. The flag comes from
// the store, not the token, so a demotion takes effect on the next request.

pub mod admin;  // User administration

pub use admin::*;
