//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - shared-password login backed by tower-sessions

pub mod auth;

pub use auth::{AdminAuthError, AdminAuthService, PasswordVerifier};
