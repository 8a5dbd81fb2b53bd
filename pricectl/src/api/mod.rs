//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//! - **[`extractors`]**: Body and path extractors that reject with the error envelope
//!
//! # API Structure
//!
//! - **Pricing models** (`/pricing-models`, `/pricing-models/{id}`)
//! - **Prices** (`/pricing-models/{id}/prices`, `/pricing-models/{id}/prices/{price_id}`)
//! - **Machines** (`/machines/{id}/prices`, `/machines/{id}/prices/{pricing_id}`)
//!
//! The OpenAPI document is served at `/api-docs/openapi.json` and rendered at `/docs`.

pub mod extractors;
pub mod handlers;
pub mod models;
