//! Database layer for data persistence and access.
//!
//! SQLx against PostgreSQL, organised as repositories over table models:
//!
//! ```text
//! ┌──────────────┐
//! │ PostgresStore│  (store::postgres - transactions & locking)
//! └──────┬───────┘
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! - [`handlers`]: Repository implementations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types

pub mod errors;
pub mod handlers;
pub mod models;
