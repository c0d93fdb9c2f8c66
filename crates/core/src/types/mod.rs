//! Core types for the agency site.

pub mod id;

pub use id::*;
