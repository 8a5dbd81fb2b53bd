//! Database record models matching table schemas.
//!
//! Each struct corresponds to a row of one table and derives `sqlx::FromRow`.
//! Database models are kept distinct from the API models in [`crate::api::models`]
//! so the storage and wire representations can evolve independently.
//!
//! - [`pricing_models`]: Named pricing models
//! - [`prices`]: Price lines, optionally attached to a pricing model
//! - [`machines`]: Machines, optionally assigned a pricing model

pub mod machines;
pub mod prices;
pub mod pricing_models;
