pub mod auth;
pub mod response;
pub mod superuser;

pub use auth::jwt_auth_middleware;
pub use response::{ApiResponse, ApiResult, Paginated};
pub use superuser::require_superuser;
