pub mod login;     // POST /api/v1/users/login
pub mod register;  // POST /api/v1/users/register

pub use login::user_login;
pub use register::user_register;
