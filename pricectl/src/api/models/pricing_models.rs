//! API request and response models for pricing models.

use crate::{
    api::models::prices::{PriceEntry, PriceResponse},
    db::models::pricing_models::PricingModel,
    store::PricingModelWithPrices,
    types::{PriceId, PricingModelId},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request body for creating a pricing model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingModelCreate {
    pub name: String,
}

/// Request body for renaming a pricing model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingModelUpdate {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingModelCreatedResponse {
    pub id: PricingModelId,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingModelResponse {
    pub id: PricingModelId,
    pub name: String,
}

impl From<PricingModel> for PricingModelResponse {
    fn from(model: PricingModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// A pricing model with its price lines reduced to `{price, name, value}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingModelWithPricesResponse {
    pub id: PricingModelId,
    pub name: String,
    pub pricing: Vec<PriceEntry>,
}

impl PricingModelWithPricesResponse {
    /// The model's own prices followed by the given defaults.
    pub fn with_defaults(model: PricingModelWithPrices, defaults: &[PriceEntry]) -> Self {
        let mut response = Self::from(model);
        response.pricing.extend_from_slice(defaults);
        response
    }
}

impl From<PricingModelWithPrices> for PricingModelWithPricesResponse {
    fn from(PricingModelWithPrices { model, prices }: PricingModelWithPrices) -> Self {
        Self {
            id: model.id,
            name: model.name,
            pricing: prices.into_iter().map(PriceEntry::from).collect(),
        }
    }
}

/// A pricing model together with a newly attached price row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingModelWithPriceResponse {
    pub id: PricingModelId,
    pub name: String,
    pub pricing: PriceResponse,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct PricingModelPriceParams {
    /// Pricing model ID
    pub id: PricingModelId,
    /// Price ID
    pub price_id: PriceId,
}
