mod auth;
mod role;

pub use auth::{auth_middleware, AuthUser};
pub use role::{require_admin, require_counselor, require_counselor_or_admin};
