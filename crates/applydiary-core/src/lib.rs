//! # applydiary-core
//!
//! Core types, traits, and ownership rules for ApplyDiary.
//!
//! This crate provides the domain models, the error taxonomy, the repository
//! and backend traits, and input validation that the other ApplyDiary crates
//! depend on.

pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod logging;
pub mod models;
pub mod ownership;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, FieldIssue, ResourceKind, Result};
pub use file_safety::{detect_content_type, sanitize_filename, storage_extension};
pub use models::*;
pub use ownership::{authorize, owner_matches, Owned};
pub use traits::*;
