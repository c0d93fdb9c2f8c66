//! HTTP middleware for the content service.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Session layer (tower-sessions, `PostgreSQL` store in production)
//! 4. `RequireAdmin` extractor on every admin route

pub mod auth;
pub mod session;

pub use auth::{AdminAuthRejection, RequireAdmin, current_admin};
pub use session::{create_session_layer, postgres_session_store};
