//! HTTP handlers for the price lines of a pricing model.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use super::pricing_model_body;
use crate::{
    AppState,
    api::{
        extractors::{ApiJson, ApiPath},
        models::{
            envelope::{ApiResponse, ErrorResponse},
            prices::{PriceCreate, PriceListResponse, PriceResponse},
            pricing_models::{PricingModelPriceParams, PricingModelWithPriceResponse},
        },
    },
    errors::Result,
    store::NewPrice,
    types::PricingModelId,
};

/// List the price rows attached to a pricing model.
#[utoipa::path(
    get,
    path = "/pricing-models/{id}/prices",
    tag = "prices",
    summary = "List prices",
    params(
        ("id" = i64, Path, description = "Pricing model ID"),
    ),
    responses(
        (status = 200, description = "Price rows ordered by ID", body = ApiResponse<PriceListResponse>),
        (status = 404, description = "No such pricing model", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(pricing_id = id))]
pub async fn list_prices(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PricingModelId>,
) -> Result<ApiResponse<PriceListResponse>> {
    let prices = state.store.list_prices(id).await?;
    Ok(ApiResponse::success(PriceListResponse {
        pricing: prices.into_iter().map(PriceResponse::from).collect(),
    }))
}

/// Attach a new price to a pricing model.
#[utoipa::path(
    post,
    path = "/pricing-models/{id}/prices",
    tag = "prices",
    summary = "Add price",
    params(
        ("id" = i64, Path, description = "Pricing model ID"),
    ),
    request_body = PriceCreate,
    responses(
        (status = 201, description = "Price created", body = ApiResponse<PricingModelWithPriceResponse>),
        (status = 400, description = "Malformed body or rejected by the store", body = ErrorResponse),
        (status = 404, description = "No such pricing model", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(pricing_id = id))]
pub async fn add_price(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PricingModelId>,
    request: Result<ApiJson<PriceCreate>>,
) -> Result<(StatusCode, ApiResponse<PricingModelWithPriceResponse>)> {
    let request = pricing_model_body(&state, id, request).await?;
    let new_price = NewPrice {
        price: request.price,
        name: request.name,
        value: request.value,
    };
    let (model, price) = state.store.add_price(id, new_price).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(PricingModelWithPriceResponse {
            id: model.id,
            name: model.name,
            pricing: price.into(),
        }),
    ))
}

/// Detach a price from a pricing model. The price row itself is kept.
#[utoipa::path(
    delete,
    path = "/pricing-models/{id}/prices/{price_id}",
    tag = "prices",
    summary = "Detach price",
    params(PricingModelPriceParams),
    responses(
        (status = 204, description = "Price detached"),
        (status = 404, description = "No such pricing model, or no such price under it", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(pricing_id = params.id, price_id = params.price_id))]
pub async fn detach_price(
    State(state): State<AppState>,
    ApiPath(params): ApiPath<PricingModelPriceParams>,
) -> Result<StatusCode> {
    state.store.detach_price(params.id, params.price_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
