pub mod local_auth;

// Re-export so we can do "use crate::auth::LocalAuth;"
pub use local_auth::{AuthError, LocalAuth};
