//! Shared types and logic for Stockbook
//!
//! This crate contains the pure inventory aggregation engine plus the domain
//! types and validation rules shared between the backend and its tests. It has
//! no database or HTTP dependencies so the engine can be exercised against
//! in-memory fact sets.

pub mod aggregation;
pub mod types;
pub mod validation;

pub use aggregation::*;
pub use types::*;
pub use validation::*;
