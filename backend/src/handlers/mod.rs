//! HTTP handlers for Stockbook

pub mod address;
pub mod auth;
pub mod dashboard;
pub mod grn;
pub mod health;
pub mod invoice;
pub mod product;

pub use address::*;
pub use auth::*;
pub use dashboard::*;
pub use grn::*;
pub use health::*;
pub use invoice::*;
pub use product::*;
