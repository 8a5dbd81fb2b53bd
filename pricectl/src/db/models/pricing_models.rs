//! Database models for pricing models.

use crate::types::PricingModelId;
use serde::{Deserialize, Serialize};

/// Database representation of a pricing model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PricingModel {
    pub id: PricingModelId,
    pub name: String,
}

/// Request to create a new pricing model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingModelCreateDBRequest {
    pub name: String,
}

/// Request to rename an existing pricing model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingModelUpdateDBRequest {
    pub name: String,
}
