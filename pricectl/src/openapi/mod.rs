//! OpenAPI documentation for the pricing API.
//!
//! [`ApiDoc`] is served as JSON at `/api-docs/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::pricing_models::list_pricing_models,
        api::handlers::pricing_models::create_pricing_model,
        api::handlers::pricing_models::get_pricing_model,
        api::handlers::pricing_models::update_pricing_model,
        api::handlers::prices::list_prices,
        api::handlers::prices::add_price,
        api::handlers::prices::detach_price,
        api::handlers::machines::assign_pricing,
        api::handlers::machines::detach_pricing,
        api::handlers::machines::get_pricing,
    ),
    components(
        schemas(
            api::models::envelope::ResponseStatus,
            api::models::envelope::ErrorResponse,
            api::models::pricing_models::PricingModelCreate,
            api::models::pricing_models::PricingModelUpdate,
            api::models::pricing_models::PricingModelCreatedResponse,
            api::models::pricing_models::PricingModelResponse,
            api::models::pricing_models::PricingModelWithPricesResponse,
            api::models::pricing_models::PricingModelWithPriceResponse,
            api::models::prices::PriceEntry,
            api::models::prices::PriceCreate,
            api::models::prices::PriceResponse,
            api::models::prices::PriceListResponse,
            api::models::machines::MachineResponse,
            api::models::machines::MachinePricing,
            api::models::machines::MachineWithPricingResponse,
        )
    ),
    tags(
        (name = "pricing-models", description = "Named pricing models.

`GET /pricing-models` appends the default pricing to every model's price list;
`GET /pricing-models/{id}` returns only the model's own prices."),
        (name = "prices", description = "Price lines attached to a pricing model. Detaching a price keeps the row."),
        (name = "machines", description = "Assign pricing models to machines and read a machine's effective pricing."),
    ),
    info(
        title = "Pricing API",
        version = "1.0.0",
        description = "CRUD over pricing models, their price lines, and machine pricing assignments.

## Responses

Successful responses are wrapped as `{\"status\": \"success\", \"data\": ...}`.
Failures return `{\"status\": \"error\", \"message\": ...}` with 404 for a missing
resource and 400 for everything else.

Decimal `price` and `value` fields are accepted as numbers or strings and returned as strings."
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/pricing-models",
            "/pricing-models/{id}",
            "/pricing-models/{id}/prices",
            "/pricing-models/{id}/prices/{price_id}",
            "/machines/{id}/prices",
            "/machines/{id}/prices/{pricing_id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
        }
    }
}
