//! `songparts-core` — domain building blocks for song parts.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod part;

pub use error::{DomainError, DomainResult};
pub use id::PartId;
pub use part::{Part, PartFields};
