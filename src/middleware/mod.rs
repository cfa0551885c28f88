//! Request middleware: Basic-auth credential extraction and role guards.

pub mod auth;

pub use auth::{AuthUser, RequireAdmin, RequireAuth};
