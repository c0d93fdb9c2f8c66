//! Domain models for the admin API.

pub mod session;

pub use session::{AdminSession, MAX_SESSION_AGE, keys as session_keys};
