//! Storage seam for pricing data.
//!
//! [`PricingStore`] exposes one atomic operation per API endpoint. Each operation
//! performs its own existence checks and its mutation as a unit, so a request
//! never observes a parent that disappears between the check and the write.
//!
//! Implementations:
//! - [`PostgresStore`]: SQLx/PostgreSQL, one transaction per operation
//! - [`InMemoryStore`]: process-local tables behind a lock, for development and tests

use async_trait::async_trait;

use crate::{
    db::models::{machines::Machine, prices::Price, pricing_models::PricingModel},
    errors::Result,
    types::{MachineId, PriceId, PricingModelId},
};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

/// A pricing model together with the prices currently attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingModelWithPrices {
    pub model: PricingModel,
    pub prices: Vec<Price>,
}

/// A machine together with the prices of its assigned pricing model (empty if unassigned).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineWithPrices {
    pub machine: Machine,
    pub prices: Vec<Price>,
}

/// Input for a new price line.
#[derive(Debug, Clone)]
pub struct NewPrice {
    pub price: rust_decimal::Decimal,
    pub name: String,
    pub value: rust_decimal::Decimal,
}

/// Persistence operations backing the HTTP API.
///
/// Missing parents are reported as [`crate::errors::Error::NotFound`] naming the
/// resource kind that was checked first; no mutation happens in that case.
/// Prices within a result are always ordered by ID.
#[async_trait]
pub trait PricingStore: Send + Sync {
    /// All pricing models ordered by ID, each with its attached prices.
    async fn list_pricing_models(&self) -> Result<Vec<PricingModelWithPrices>>;

    /// Create a pricing model.
    async fn create_pricing_model(&self, name: &str) -> Result<PricingModel>;

    /// A single pricing model with its attached prices.
    async fn get_pricing_model(&self, id: PricingModelId) -> Result<PricingModelWithPrices>;

    /// Rename a pricing model, returning the updated row.
    async fn rename_pricing_model(&self, id: PricingModelId, name: &str) -> Result<PricingModel>;

    /// Prices attached to a pricing model.
    async fn list_prices(&self, pricing_id: PricingModelId) -> Result<Vec<Price>>;

    /// Attach a new price to a pricing model.
    async fn add_price(&self, pricing_id: PricingModelId, price: NewPrice) -> Result<(PricingModel, Price)>;

    /// Null the association of a price with a pricing model. The price row is kept.
    ///
    /// # Errors
    /// - `NotFound(PricingModel)` if the model is missing
    /// - `NotFound(Price)` if the price is missing or attached elsewhere
    async fn detach_price(&self, pricing_id: PricingModelId, price_id: PriceId) -> Result<()>;

    /// Fetch a price by ID regardless of attachment.
    async fn get_price(&self, price_id: PriceId) -> Result<Option<Price>>;

    /// Point a machine at a pricing model, overwriting any previous assignment.
    ///
    /// # Errors
    /// - `NotFound(Machine)` is checked before `NotFound(PricingModel)`
    async fn assign_machine_pricing(&self, machine_id: MachineId, pricing_id: PricingModelId) -> Result<Machine>;

    /// Clear a machine's pricing model, only if it is currently `pricing_id`.
    ///
    /// # Errors
    /// - `NotFound(Machine)` if the machine is missing or assigned to a different model
    async fn detach_machine_pricing(&self, machine_id: MachineId, pricing_id: PricingModelId) -> Result<()>;

    /// A machine with the prices of its current pricing model.
    async fn get_machine_pricing(&self, machine_id: MachineId) -> Result<MachineWithPrices>;

    /// Create a machine by name unless it already exists.
    async fn ensure_machine(&self, name: &str) -> Result<Machine>;
}
