//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Kind of counterparty an address represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PersonKind {
    Vendor,
    Customer,
}

impl PersonKind {
    /// Label as stored in the person_type table
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonKind::Vendor => "Vendor",
            PersonKind::Customer => "Customer",
        }
    }
}
