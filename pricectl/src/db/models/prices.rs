//! Database models for price lines.

use crate::types::{PriceId, PricingModelId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Database representation of a price line.
///
/// `pricing_id` is `None` once the price has been detached from its pricing model;
/// the row itself is never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Price {
    pub id: PriceId,
    pub price: Decimal,
    pub name: String,
    pub value: Decimal,
    pub pricing_id: Option<PricingModelId>,
}

/// Request to create a new price attached to a pricing model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCreateDBRequest {
    pub pricing_id: PricingModelId,
    pub price: Decimal,
    pub name: String,
    pub value: Decimal,
}
