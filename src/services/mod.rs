pub mod account;
pub mod bootstrap;
pub mod defaults;
pub mod user_admin;

pub use account::{AccountError, AccountService, LoginRequest, LoginResponse, RegisterRequest};
pub use bootstrap::{BootstrapError, BootstrapOutcome, BootstrapReconciler, BootstrapStage, SkipReason};
pub use defaults::{seed_group_defaults, SeedReport};
pub use user_admin::{parse_id, AdminError, AdminService, AdminUserCreate, AdminUserUpdate};
