//! TechFix Core - Shared content types.
//!
//! This crate provides the types shared by the TechFix-IT components:
//! - `site` - Public marketing pages, the admin area and the JSON content API
//! - `cli` - Command-line tools for migrations, admin users and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Rows cross into this crate as JSON maps and leave
//! it the same way, so both the Postgres store and the in-memory store share
//! one normalization path.
//!
//! # Modules
//!
//! - [`types`] - Content kinds, icon and legal-slug enumerations, emails, IDs
//! - [`content`] - Entities, singleton documents and the schema normalizer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod content;
pub mod types;

pub use content::*;
pub use types::*;
