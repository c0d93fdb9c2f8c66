//! Agency Core - Shared content types.
//!
//! This crate provides the types used across the agency site components:
//! - `admin` - Content API and password-gated admin surface
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O,
//! no database access, no HTTP clients. Persistence lives in the admin crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype record IDs
//! - [`records`] - Managed collection entities and the [`Record`] trait
//! - [`ordering`] - `order_index` rules: sorting, append index, reorder plans
//! - [`grouping`] - Category buckets for team members
//! - [`settings`] - Singleton site settings (hero, about, contact)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod grouping;
pub mod ordering;
pub mod records;
pub mod settings;
pub mod types;

pub use grouping::{Bucket, Categorized, UNCATEGORIZED_LABEL, group_by_category};
pub use ordering::{
    Direction, Placement, ReorderPlan, Stored, next_order_index, plan_reorder, sort_ordered,
};
pub use records::{
    Category, Client, Collection, EmploymentType, GalleryItem, JobListing, MediaType,
    PortfolioItem, Record, Service, TeamMember, ValidationError,
};
pub use settings::{AboutSettings, ContactSettings, HeroSettings, SiteSetting, SettingsKind};
pub use types::*;
