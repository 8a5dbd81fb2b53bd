//! Axum route handlers, one module per resource.
//!
//! Handlers delegate each request to a single [`crate::store::PricingStore`]
//! operation and wrap the result in the JSON envelope from
//! [`crate::api::models::envelope`]. Failures are returned as
//! [`crate::errors::Error`], which renders the error envelope.

use crate::{AppState, api::extractors::ApiJson, errors::Result, types::PricingModelId};

pub mod machines;
pub mod prices;
pub mod pricing_models;

/// Unwrap the JSON body of a request scoped to a pricing model.
///
/// A missing model is reported as 404 ahead of a malformed body.
pub(crate) async fn pricing_model_body<T>(
    state: &AppState,
    id: PricingModelId,
    body: Result<ApiJson<T>>,
) -> Result<T> {
    match body {
        Ok(ApiJson(body)) => Ok(body),
        Err(rejection) => {
            state.store.get_pricing_model(id).await?;
            Err(rejection)
        }
    }
}
