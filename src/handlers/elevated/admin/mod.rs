// handlers/elevated/admin/mod.rs - Superuser administrative handlers

pub mod user;  // User account administration

pub use user::*;
