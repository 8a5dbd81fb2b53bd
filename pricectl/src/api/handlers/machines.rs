//! HTTP handlers for machine pricing assignments.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::{
    AppState,
    api::{
        extractors::ApiPath,
        models::{
            envelope::{ApiResponse, ErrorResponse},
            machines::{MachinePricingParams, MachineResponse, MachineWithPricingResponse},
        },
    },
    errors::Result,
    types::MachineId,
};

/// Assign a pricing model to a machine, replacing any previous assignment.
#[utoipa::path(
    put,
    path = "/machines/{id}/prices/{pricing_id}",
    tag = "machines",
    summary = "Assign pricing model",
    params(MachinePricingParams),
    responses(
        (status = 200, description = "Updated machine", body = ApiResponse<MachineResponse>),
        (status = 404, description = "No such machine, or no such pricing model", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(machine_id = params.id, pricing_id = params.pricing_id))]
pub async fn assign_pricing(
    State(state): State<AppState>,
    ApiPath(params): ApiPath<MachinePricingParams>,
) -> Result<ApiResponse<MachineResponse>> {
    let machine = state.store.assign_machine_pricing(params.id, params.pricing_id).await?;
    Ok(ApiResponse::success(machine.into()))
}

/// Remove a machine's pricing model. Only succeeds if the machine currently uses that model.
#[utoipa::path(
    delete,
    path = "/machines/{id}/prices/{pricing_id}",
    tag = "machines",
    summary = "Detach pricing model",
    params(MachinePricingParams),
    responses(
        (status = 204, description = "Pricing model detached"),
        (status = 404, description = "No such machine assigned to this pricing model", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(machine_id = params.id, pricing_id = params.pricing_id))]
pub async fn detach_pricing(
    State(state): State<AppState>,
    ApiPath(params): ApiPath<MachinePricingParams>,
) -> Result<StatusCode> {
    state.store.detach_machine_pricing(params.id, params.pricing_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the prices that apply to a machine.
///
/// Falls back to the default pricing when the machine has no pricing model or
/// its model has no price lines.
#[utoipa::path(
    get,
    path = "/machines/{id}/prices",
    tag = "machines",
    summary = "Get machine pricing",
    params(
        ("id" = i64, Path, description = "Machine ID"),
    ),
    responses(
        (status = 200, description = "Machine with its effective pricing", body = ApiResponse<MachineWithPricingResponse>),
        (status = 404, description = "No such machine", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(machine_id = id))]
pub async fn get_pricing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<MachineId>,
) -> Result<ApiResponse<MachineWithPricingResponse>> {
    let machine = state.store.get_machine_pricing(id).await?;
    Ok(ApiResponse::success(MachineWithPricingResponse::new(
        machine,
        state.default_pricing.entries(),
    )))
}
