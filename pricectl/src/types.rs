//! Common type definitions.
//!
//! This module defines:
//! - Type aliases for entity IDs (PricingModelId, PriceId, MachineId)
//! - The [`Resource`] enum naming the entity kinds a request can reference
//!
//! # ID Types
//!
//! All entity IDs are database-generated `BIGSERIAL` values:
//!
//! - [`PricingModelId`]: Pricing model identifier
//! - [`PriceId`]: Price line identifier
//! - [`MachineId`]: Machine identifier

use std::fmt;

// Type aliases for IDs
pub type PricingModelId = i64;
pub type PriceId = i64;
pub type MachineId = i64;

/// Entity kinds referenced by path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    PricingModel,
    Price,
    Machine,
}

impl Resource {
    /// Fixed, client-facing message returned when an entity of this kind is missing.
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Resource::PricingModel => "No such pricing model",
            Resource::Price => "No such price model",
            Resource::Machine => "No such machine model",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::PricingModel => write!(f, "Pricing model"),
            Resource::Price => write!(f, "Price"),
            Resource::Machine => write!(f, "Machine"),
        }
    }
}
