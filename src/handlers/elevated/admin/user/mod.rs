// handlers/elevated/admin/user/mod.rs - User administration handlers
//
// Every route here sits behind jwt_auth_middleware and require_superuser; the
// handlers receive an actor that has already passed the privilege gate.

pub mod create;     // POST /api/v1/admin/users
pub mod delete;     // DELETE /api/v1/admin/users/:id
pub mod list;       // GET /api/v1/admin/users
pub mod superuser;  // PUT /api/v1/admin/users/:id/superuser
pub mod update;     // PUT /api/v1/admin/users/:id

pub use create::user_create;
pub use delete::user_delete;
pub use list::user_list;
pub use superuser::user_set_superuser;
pub use update::user_update;
