//! # atelier-core
//!
//! Core types and shared definitions for the atelier artist workspace.
//!
//! This crate provides the records the workspace tree manager and the support
//! classifier operate on, the error type both surface to their HTTP callers,
//! and the constants and logging field names used across the workspace.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod uuid_utils;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use uuid_utils::new_v7;
pub use validation::validate_title;
