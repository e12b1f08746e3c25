//! Application services used by route handlers and startup.

pub mod admin_bootstrap;
pub mod auth;

pub use admin_bootstrap::{bootstrap_super_admin, BootstrapError};
pub use auth::{AuthError, AuthService, LoginResult, TokenPair};
