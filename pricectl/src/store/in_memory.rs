//! In-memory implementation of [`PricingStore`].
//!
//! Tables live in ordered maps behind a single lock. Every operation takes the
//! lock once, so existence checks and mutations are atomic with respect to each
//! other. Data is lost on restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::instrument;

use super::{MachineWithPrices, NewPrice, PricingModelWithPrices, PricingStore};
use crate::{
    db::models::{machines::Machine, prices::Price, pricing_models::PricingModel},
    errors::{Error, Result},
    types::{MachineId, PriceId, PricingModelId, Resource},
};

#[derive(Default)]
struct Tables {
    pricing: BTreeMap<PricingModelId, PricingModel>,
    prices: BTreeMap<PriceId, Price>,
    machines: BTreeMap<MachineId, Machine>,
    next_pricing_id: PricingModelId,
    next_price_id: PriceId,
    next_machine_id: MachineId,
}

impl Tables {
    fn new() -> Self {
        Self {
            next_pricing_id: 1,
            next_price_id: 1,
            next_machine_id: 1,
            ..Default::default()
        }
    }

    fn pricing_model(&self, id: PricingModelId) -> Result<&PricingModel> {
        self.pricing.get(&id).ok_or_else(|| Error::not_found(Resource::PricingModel, id))
    }

    fn prices_of(&self, pricing_id: PricingModelId) -> Vec<Price> {
        self.prices
            .values()
            .filter(|p| p.pricing_id == Some(pricing_id))
            .cloned()
            .collect()
    }
}

/// Process-local pricing store.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PricingStore for InMemoryStore {
    #[instrument(skip(self), err)]
    async fn list_pricing_models(&self) -> Result<Vec<PricingModelWithPrices>> {
        let tables = self.tables.read();
        Ok(tables
            .pricing
            .values()
            .map(|model| PricingModelWithPrices {
                model: model.clone(),
                prices: tables.prices_of(model.id),
            })
            .collect())
    }

    #[instrument(skip(self), err)]
    async fn create_pricing_model(&self, name: &str) -> Result<PricingModel> {
        let mut tables = self.tables.write();
        let id = tables.next_pricing_id;
        tables.next_pricing_id += 1;

        let model = PricingModel {
            id,
            name: name.to_string(),
        };
        tables.pricing.insert(id, model.clone());
        Ok(model)
    }

    #[instrument(skip(self), err)]
    async fn get_pricing_model(&self, id: PricingModelId) -> Result<PricingModelWithPrices> {
        let tables = self.tables.read();
        let model = tables.pricing_model(id)?.clone();
        Ok(PricingModelWithPrices {
            prices: tables.prices_of(id),
            model,
        })
    }

    #[instrument(skip(self), err)]
    async fn rename_pricing_model(&self, id: PricingModelId, name: &str) -> Result<PricingModel> {
        let mut tables = self.tables.write();
        let model = tables
            .pricing
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(Resource::PricingModel, id))?;
        model.name = name.to_string();
        Ok(model.clone())
    }

    #[instrument(skip(self), err)]
    async fn list_prices(&self, pricing_id: PricingModelId) -> Result<Vec<Price>> {
        let tables = self.tables.read();
        tables.pricing_model(pricing_id)?;
        Ok(tables.prices_of(pricing_id))
    }

    #[instrument(skip(self, price), fields(name = %price.name), err)]
    async fn add_price(&self, pricing_id: PricingModelId, price: NewPrice) -> Result<(PricingModel, Price)> {
        let mut tables = self.tables.write();
        let model = tables.pricing_model(pricing_id)?.clone();

        let id = tables.next_price_id;
        tables.next_price_id += 1;

        let price = Price {
            id,
            price: price.price,
            name: price.name,
            value: price.value,
            pricing_id: Some(pricing_id),
        };
        tables.prices.insert(id, price.clone());
        Ok((model, price))
    }

    #[instrument(skip(self), err)]
    async fn detach_price(&self, pricing_id: PricingModelId, price_id: PriceId) -> Result<()> {
        let mut tables = self.tables.write();
        tables.pricing_model(pricing_id)?;

        match tables.prices.get_mut(&price_id) {
            Some(price) if price.pricing_id == Some(pricing_id) => {
                price.pricing_id = None;
                Ok(())
            }
            _ => Err(Error::not_found(Resource::Price, price_id)),
        }
    }

    #[instrument(skip(self), err)]
    async fn get_price(&self, price_id: PriceId) -> Result<Option<Price>> {
        Ok(self.tables.read().prices.get(&price_id).cloned())
    }

    #[instrument(skip(self), err)]
    async fn assign_machine_pricing(&self, machine_id: MachineId, pricing_id: PricingModelId) -> Result<Machine> {
        let mut tables = self.tables.write();
        if !tables.machines.contains_key(&machine_id) {
            return Err(Error::not_found(Resource::Machine, machine_id));
        }
        tables.pricing_model(pricing_id)?;

        let machine = tables
            .machines
            .get_mut(&machine_id)
            .ok_or_else(|| Error::not_found(Resource::Machine, machine_id))?;
        machine.pricing_id = Some(pricing_id);
        Ok(machine.clone())
    }

    #[instrument(skip(self), err)]
    async fn detach_machine_pricing(&self, machine_id: MachineId, pricing_id: PricingModelId) -> Result<()> {
        let mut tables = self.tables.write();
        match tables.machines.get_mut(&machine_id) {
            Some(machine) if machine.pricing_id == Some(pricing_id) => {
                machine.pricing_id = None;
                Ok(())
            }
            _ => Err(Error::not_found(Resource::Machine, machine_id)),
        }
    }

    #[instrument(skip(self), err)]
    async fn get_machine_pricing(&self, machine_id: MachineId) -> Result<MachineWithPrices> {
        let tables = self.tables.read();
        let machine = tables
            .machines
            .get(&machine_id)
            .cloned()
            .ok_or_else(|| Error::not_found(Resource::Machine, machine_id))?;
        let prices = machine.pricing_id.map(|id| tables.prices_of(id)).unwrap_or_default();
        Ok(MachineWithPrices { machine, prices })
    }

    #[instrument(skip(self), err)]
    async fn ensure_machine(&self, name: &str) -> Result<Machine> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.machines.values().find(|m| m.name == name) {
            return Ok(existing.clone());
        }

        let id = tables.next_machine_id;
        tables.next_machine_id += 1;

        let machine = Machine {
            id,
            name: name.to_string(),
            pricing_id: None,
        };
        tables.machines.insert(id, machine.clone());
        Ok(machine)
    }
}
