//! MindHaven Core
//!
//! Core types and utilities shared across MindHaven components.
//!
//! This crate provides:
//! - Conversation types (`Role`, `Turn`) and the mental-state taxonomy
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{MentalState, Role, Turn};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{MentalState, Role, Turn};
}
