//! HTTP handlers for pricing model endpoints.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use super::pricing_model_body;
use crate::{
    AppState,
    api::{
        extractors::{ApiJson, ApiPath},
        models::{
            envelope::{ApiResponse, ErrorResponse},
            pricing_models::{
                PricingModelCreate, PricingModelCreatedResponse, PricingModelResponse, PricingModelUpdate,
                PricingModelWithPricesResponse,
            },
        },
    },
    errors::Result,
    types::PricingModelId,
};

/// List all pricing models.
///
/// Each model's `pricing` holds its own price lines followed by the default pricing.
#[utoipa::path(
    get,
    path = "/pricing-models",
    tag = "pricing-models",
    summary = "List pricing models",
    responses(
        (status = 200, description = "All pricing models, with default pricing appended", body = ApiResponse<Vec<PricingModelWithPricesResponse>>),
        (status = 400, description = "Store error", body = ErrorResponse),
    )
)]
#[instrument(skip_all)]
pub async fn list_pricing_models(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PricingModelWithPricesResponse>>> {
    let models = state.store.list_pricing_models().await?;
    let defaults = state.default_pricing.entries();

    Ok(ApiResponse::success(
        models
            .into_iter()
            .map(|model| PricingModelWithPricesResponse::with_defaults(model, defaults))
            .collect(),
    ))
}

/// Create a pricing model.
#[utoipa::path(
    post,
    path = "/pricing-models",
    tag = "pricing-models",
    summary = "Create pricing model",
    request_body = PricingModelCreate,
    responses(
        (status = 201, description = "Pricing model created", body = ApiResponse<PricingModelCreatedResponse>),
        (status = 400, description = "Malformed body or rejected by the store", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(name = %request.name))]
pub async fn create_pricing_model(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PricingModelCreate>,
) -> Result<(StatusCode, ApiResponse<PricingModelCreatedResponse>)> {
    let model = state.store.create_pricing_model(&request.name).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(PricingModelCreatedResponse { id: model.id })))
}

/// Get a pricing model with its own price lines.
///
/// Default pricing is not merged into this response.
#[utoipa::path(
    get,
    path = "/pricing-models/{id}",
    tag = "pricing-models",
    summary = "Get pricing model",
    params(
        ("id" = i64, Path, description = "Pricing model ID"),
    ),
    responses(
        (status = 200, description = "Pricing model", body = ApiResponse<PricingModelWithPricesResponse>),
        (status = 404, description = "No such pricing model", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(pricing_id = id))]
pub async fn get_pricing_model(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PricingModelId>,
) -> Result<ApiResponse<PricingModelWithPricesResponse>> {
    let model = state.store.get_pricing_model(id).await?;
    Ok(ApiResponse::success(model.into()))
}

/// Rename a pricing model.
#[utoipa::path(
    put,
    path = "/pricing-models/{id}",
    tag = "pricing-models",
    summary = "Update pricing model",
    params(
        ("id" = i64, Path, description = "Pricing model ID"),
    ),
    request_body = PricingModelUpdate,
    responses(
        (status = 200, description = "Updated pricing model", body = ApiResponse<PricingModelResponse>),
        (status = 400, description = "Malformed body or rejected by the store", body = ErrorResponse),
        (status = 404, description = "No such pricing model", body = ErrorResponse),
    )
)]
#[instrument(skip_all, fields(pricing_id = id))]
pub async fn update_pricing_model(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PricingModelId>,
    request: Result<ApiJson<PricingModelUpdate>>,
) -> Result<ApiResponse<PricingModelResponse>> {
    let request = pricing_model_body(&state, id, request).await?;
    let model = state.store.rename_pricing_model(id, &request.name).await?;
    Ok(ApiResponse::success(model.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_pg_test_app, create_test_app, default_pricing_fixture};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::PgPool;

    #[test_log::test(tokio::test)]
    async fn test_create_then_get_has_empty_pricing() {
        let (server, _store) = create_test_app().await;

        let response = server.post("/pricing-models").json(&json!({"name": "A"})).await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        let id = body["data"]["id"].as_i64().unwrap();

        let response = server.get(&format!("/pricing-models/{id}")).await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "status": "success",
            "data": {"id": id, "name": "A", "pricing": []}
        }));
    }

    #[tokio::test]
    async fn test_list_appends_defaults_but_get_does_not() {
        let (server, _store) = create_test_app().await;

        let id = server.post("/pricing-models").json(&json!({"name": "A"})).await.json::<Value>()["data"]["id"]
            .as_i64()
            .unwrap();
        server
            .post(&format!("/pricing-models/{id}/prices"))
            .json(&json!({"price": 7, "name": "cpu", "value": 1}))
            .await
            .assert_status(StatusCode::CREATED);

        let list: Value = server.get("/pricing-models").await.json();
        let pricing = list["data"][0]["pricing"].as_array().unwrap();
        assert_eq!(pricing.len(), 1 + default_pricing_fixture().len());
        assert_eq!(pricing[0], json!({"price": "7", "name": "cpu", "value": "1"}));
        assert_eq!(pricing[1]["name"], default_pricing_fixture()[0].name);

        let single: Value = server.get(&format!("/pricing-models/{id}")).await.json();
        assert_eq!(single["data"]["pricing"], json!([{"price": "7", "name": "cpu", "value": "1"}]));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let (server, _store) = create_test_app().await;
        for name in ["first", "second", "third"] {
            server.post("/pricing-models").json(&json!({"name": name})).await;
        }

        let list: Value = server.get("/pricing-models").await.json();
        let names: Vec<_> = list["data"].as_array().unwrap().iter().map(|m| m["name"].clone()).collect();
        assert_eq!(names, vec![json!("first"), json!("second"), json!("third")]);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (server, _store) = create_test_app().await;
        server
            .get("/pricing-models")
            .await
            .assert_json(&json!({"status": "success", "data": []}));
    }

    #[tokio::test]
    async fn test_get_missing_model_is_404() {
        let (server, _store) = create_test_app().await;
        let response = server.get("/pricing-models/999").await;
        response.assert_status_not_found();
        response.assert_json(&json!({"status": "error", "message": "No such pricing model"}));
    }

    #[tokio::test]
    async fn test_update_renames() {
        let (server, _store) = create_test_app().await;
        let id = server.post("/pricing-models").json(&json!({"name": "A"})).await.json::<Value>()["data"]["id"]
            .as_i64()
            .unwrap();

        let response = server.put(&format!("/pricing-models/{id}")).json(&json!({"name": "B"})).await;
        response.assert_status_ok();
        response.assert_json(&json!({"status": "success", "data": {"id": id, "name": "B"}}));
    }

    #[tokio::test]
    async fn test_update_missing_model_is_404() {
        let (server, _store) = create_test_app().await;
        let response = server.put("/pricing-models/42").json(&json!({"name": "B"})).await;
        response.assert_status_not_found();
        response.assert_json(&json!({"status": "error", "message": "No such pricing model"}));
    }

    #[tokio::test]
    async fn test_malformed_requests_are_400_envelopes() {
        let (server, _store) = create_test_app().await;

        let response = server.post("/pricing-models").json(&json!({"title": "A"})).await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

        let response = server.get("/pricing-models/not-a-number").await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["status"], "error");
    }

    #[tokio::test]
    async fn test_update_missing_model_with_bad_body_is_404() {
        let (server, _store) = create_test_app().await;

        let response = server.put("/pricing-models/0").json(&json!({})).await;
        response.assert_status_not_found();
        response.assert_json(&json!({"status": "error", "message": "No such pricing model"}));
    }

    #[tokio::test]
    async fn test_update_existing_model_with_bad_body_is_400() {
        let (server, _store) = create_test_app().await;
        let id = server.post("/pricing-models").json(&json!({"name": "A"})).await.json::<Value>()["data"]["id"]
            .as_i64()
            .unwrap();

        let response = server.put(&format!("/pricing-models/{id}")).json(&json!({})).await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["status"], "error");
    }

    #[sqlx::test]
    async fn test_pg_create_get_and_list_asymmetry(pool: PgPool) {
        let (server, _store) = create_pg_test_app(pool).await;

        let response = server.post("/pricing-models").json(&json!({"name": "A"})).await;
        response.assert_status(StatusCode::CREATED);
        let id = response.json::<Value>()["data"]["id"].as_i64().unwrap();

        server
            .get(&format!("/pricing-models/{id}"))
            .await
            .assert_json(&json!({"status": "success", "data": {"id": id, "name": "A", "pricing": []}}));

        server
            .post(&format!("/pricing-models/{id}/prices"))
            .json(&json!({"price": 7, "name": "cpu", "value": 1}))
            .await
            .assert_status(StatusCode::CREATED);

        let list: Value = server.get("/pricing-models").await.json();
        let pricing = list["data"][0]["pricing"].as_array().unwrap();
        assert_eq!(pricing.len(), 1 + default_pricing_fixture().len());
        assert_eq!(pricing[0], json!({"price": "7", "name": "cpu", "value": "1"}));

        let single: Value = server.get(&format!("/pricing-models/{id}")).await.json();
        assert_eq!(single["data"]["pricing"], json!([{"price": "7", "name": "cpu", "value": "1"}]));
    }

    #[sqlx::test]
    async fn test_pg_missing_model_is_404(pool: PgPool) {
        let (server, _store) = create_pg_test_app(pool).await;

        let response = server.get("/pricing-models/999").await;
        response.assert_status_not_found();
        response.assert_json(&json!({"status": "error", "message": "No such pricing model"}));

        let response = server.put("/pricing-models/999").json(&json!({"name": "B"})).await;
        response.assert_status_not_found();

        let response = server.put("/pricing-models/0").json(&json!({})).await;
        response.assert_status_not_found();
        response.assert_json(&json!({"status": "error", "message": "No such pricing model"}));
    }

    #[sqlx::test]
    async fn test_pg_update_renames(pool: PgPool) {
        let (server, _store) = create_pg_test_app(pool).await;
        let id = server.post("/pricing-models").json(&json!({"name": "A"})).await.json::<Value>()["data"]["id"]
            .as_i64()
            .unwrap();

        let response = server.put(&format!("/pricing-models/{id}")).json(&json!({"name": "B"})).await;
        response.assert_status_ok();
        response.assert_json(&json!({"status": "success", "data": {"id": id, "name": "B"}}));
    }
}
