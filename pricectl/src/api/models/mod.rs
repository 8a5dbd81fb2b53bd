//! API request and response data models.
//!
//! These structures define the public JSON contract and are kept separate from
//! the database records in [`crate::db::models`]. All of them carry `utoipa`
//! annotations for the generated OpenAPI document.
//!
//! - [`envelope`]: The `{status, data}` / `{status, message}` wrappers
//! - [`pricing_models`]: Pricing model requests and responses
//! - [`prices`]: Price lines and default pricing entries
//! - [`machines`]: Machine pricing assignments

pub mod envelope;
pub mod machines;
pub mod prices;
pub mod pricing_models;
