//! API request and response models for price lines.

use crate::{
    db::models::prices::Price,
    types::{PriceId, PricingModelId},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A price line without identity: the shape of default pricing entries and
/// of the `pricing` arrays embedded in pricing model responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceEntry {
    /// Accepted as a number or string, returned as a string to preserve precision
    #[schema(value_type = String)]
    pub price: Decimal,
    pub name: String,
    #[schema(value_type = String)]
    pub value: Decimal,
}

impl From<Price> for PriceEntry {
    fn from(price: Price) -> Self {
        Self {
            price: price.price,
            name: price.name,
            value: price.value,
        }
    }
}

/// Request body for attaching a new price to a pricing model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceCreate {
    #[schema(value_type = String)]
    pub price: Decimal,
    pub name: String,
    #[schema(value_type = String)]
    pub value: Decimal,
}

/// A full price row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceResponse {
    pub id: PriceId,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub name: String,
    #[schema(value_type = String)]
    pub value: Decimal,
    pub pricing_id: Option<PricingModelId>,
}

impl From<Price> for PriceResponse {
    fn from(price: Price) -> Self {
        Self {
            id: price.id,
            price: price.price,
            name: price.name,
            value: price.value,
            pricing_id: price.pricing_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceListResponse {
    pub pricing: Vec<PriceResponse>,
}
