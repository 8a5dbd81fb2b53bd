//! Repository implementations for database access.
//!
//! Each repository wraps a borrowed `PgConnection` (usually a transaction) and
//! exposes strongly-typed queries for one table, returning records from
//! [`crate::db::models`]. Callers own the transaction and decide when to commit:
//!
//! ```ignore
//! use pricectl::db::handlers::{Prices, PricingModels};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!
//!     let model = PricingModels::new(&mut tx).get_by_id_for_share(1).await?;
//!     let prices = Prices::new(&mut tx).list_by_pricing_model(1).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod machines;
pub mod prices;
pub mod pricing_models;

pub use machines::Machines;
pub use prices::Prices;
pub use pricing_models::PricingModels;
