//! API response models for machines.

use crate::{
    api::models::prices::{PriceEntry, PriceResponse},
    db::models::machines::Machine,
    store::MachineWithPrices,
    types::{MachineId, PricingModelId},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MachineResponse {
    pub id: MachineId,
    pub name: String,
    pub pricing_id: Option<PricingModelId>,
}

impl From<Machine> for MachineResponse {
    fn from(machine: Machine) -> Self {
        Self {
            id: machine.id,
            name: machine.name,
            pricing_id: machine.pricing_id,
        }
    }
}

/// Prices that apply to a machine: its pricing model's rows, or the defaults
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum MachinePricing {
    Configured(Vec<PriceResponse>),
    Default(Vec<PriceEntry>),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MachineWithPricingResponse {
    pub id: MachineId,
    pub name: String,
    pub pricing: MachinePricing,
}

impl MachineWithPricingResponse {
    /// Falls back to `defaults` when the machine has no priced entries.
    pub fn new(MachineWithPrices { machine, prices }: MachineWithPrices, defaults: &[PriceEntry]) -> Self {
        let pricing = if prices.is_empty() {
            MachinePricing::Default(defaults.to_vec())
        } else {
            MachinePricing::Configured(prices.into_iter().map(PriceResponse::from).collect())
        };

        Self {
            id: machine.id,
            name: machine.name,
            pricing,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct MachinePricingParams {
    /// Machine ID
    pub id: MachineId,
    /// Pricing model ID
    pub pricing_id: PricingModelId,
}
