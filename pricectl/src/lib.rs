//! # pricectl: Pricing Model Control API
//!
//! `pricectl` is a small REST service managing pricing models, the price lines attached to them,
//! and which pricing model each machine uses. Machines without priced entries fall back to a
//! default price list loaded from a JSON file at startup.
//!
//! ## Architecture
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum). Each handler performs a
//! single call on a [`store::PricingStore`], which is either PostgreSQL (via SQLx, with schema
//! migrations) or an in-memory store for development and tests. Every store operation performs
//! its existence checks and its mutation atomically.
//!
//! ```text
//! HTTP request ─▶ api::handlers ─▶ PricingStore ─┬─▶ PostgresStore ─▶ db::handlers ─▶ PostgreSQL
//!                      │                          └─▶ InMemoryStore
//!                      └─▶ DefaultPricing (merged into list/machine responses)
//! ```
//!
//! ## Responses
//!
//! Successful responses are `{"status": "success", "data": ...}`; failures are
//! `{"status": "error", "message": ...}`, with 404 for a missing resource and 400 otherwise.
//!
//! ## Lifecycle
//!
//! 1. **Create**: [`Application::new`] loads the default pricing, connects the store (running
//!    migrations for PostgreSQL), provisions configured machines and builds the router
//! 2. **Serve**: [`Application::serve`] binds to `host:port` and handles requests, unless
//!    `test_mode` is set
//! 3. **Shutdown**: on the shutdown signal, in-flight requests drain, then the pool closes and
//!    telemetry flushes

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod pricing_defaults;
pub mod store;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};
use bon::Builder;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    api::handlers::{machines, prices, pricing_models},
    config::{Config, DatabaseConfig},
    openapi::ApiDoc,
    pricing_defaults::DefaultPricing,
    store::{InMemoryStore, PostgresStore, PricingStore},
};

/// Shared state handed to every request handler.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .store(Arc::new(InMemoryStore::new()))
///     .default_pricing(DefaultPricing::empty())
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn PricingStore>,
    #[builder(default)]
    pub default_pricing: DefaultPricing,
    #[builder(default)]
    pub config: Config,
}

/// Get the pricectl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Ensure every configured machine exists. Existing machines keep their pricing assignment.
#[instrument(skip_all, fields(count = names.len()))]
pub async fn provision_machines(store: &dyn PricingStore, names: &[String]) -> errors::Result<()> {
    for name in names {
        let machine = store.ensure_machine(name).await?;
        debug!(machine_id = machine.id, name = %machine.name, "Machine provisioned");
    }
    Ok(())
}

/// Connect the configured store. Returns the pool too when PostgreSQL is used, so it can be
/// closed on shutdown.
#[instrument(skip_all)]
async fn setup_store(config: &Config) -> anyhow::Result<(Arc<dyn PricingStore>, Option<PgPool>)> {
    match &config.database {
        DatabaseConfig::Memory => {
            info!("Using in-memory store; data will be lost on shutdown");
            Ok((Arc::new(InMemoryStore::new()), None))
        }
        DatabaseConfig::External { url, pool } => {
            info!("Using external database");
            let pg_pool = pool.pg_pool_options().connect(url).await?;
            migrator().run(&pg_pool).await?;
            Ok((Arc::new(PostgresStore::new(pg_pool.clone())), Some(pg_pool)))
        }
    }
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/pricing-models",
            get(pricing_models::list_pricing_models).post(pricing_models::create_pricing_model),
        )
        .route(
            "/pricing-models/{id}",
            get(pricing_models::get_pricing_model).put(pricing_models::update_pricing_model),
        )
        .route("/pricing-models/{id}/prices", get(prices::list_prices).post(prices::add_price))
        .route("/pricing-models/{id}/prices/{price_id}", axum::routing::delete(prices::detach_price))
        .route("/machines/{id}/prices", get(machines::get_pricing))
        .route(
            "/machines/{id}/prices/{pricing_id}",
            put(machines::assign_pricing).delete(machines::detach_pricing),
        );

    Router::new()
        .route("/", get(|| async { "hello world" }))
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(tower_http::trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns the router and its backing resources.
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting pricectl with configuration: {:#?}", config);

        let default_pricing = DefaultPricing::load(&config.default_pricing_path).await?;
        let (store, pool) = setup_store(&config).await?;
        provision_machines(store.as_ref(), &config.machines).await?;

        let state = AppState::builder()
            .store(store)
            .default_pricing(default_pricing)
            .config(config.clone())
            .build();
        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application. Returns immediately in test mode.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        if self.config.test_mode {
            info!("Test mode enabled; not binding a listener");
            return Ok(());
        }

        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "pricectl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::create_test_config;
    use axum::http::StatusCode;
    use serde_json::Value;
    use std::io::Write;

    fn pricing_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test_log::test(tokio::test)]
    async fn test_application_provisions_machines_with_defaults() {
        let file = pricing_file(r#"{"default_pricing": [{"price": 2, "name": "cpu", "value": 1}]}"#);
        let config = Config {
            default_pricing_path: file.path().to_path_buf(),
            machines: vec!["gpu-01".to_string(), "gpu-01".to_string(), "gpu-02".to_string()],
            ..create_test_config()
        };

        let server = Application::new(config).await.unwrap().into_test_server();

        let body: Value = server.get("/machines/1/prices").await.json();
        assert_eq!(body["data"]["name"], "gpu-01");
        assert_eq!(body["data"]["pricing"][0]["name"], "cpu");

        server.get("/machines/2/prices").await.assert_status_ok();
        server.get("/machines/3/prices").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_application_with_malformed_defaults_starts_empty() {
        let file = pricing_file("{ not json");
        let config = Config {
            default_pricing_path: file.path().to_path_buf(),
            machines: vec!["gpu-01".to_string()],
            ..create_test_config()
        };

        let server = Application::new(config).await.unwrap().into_test_server();
        let body: Value = server.get("/machines/1/prices").await.json();
        assert_eq!(body["data"]["pricing"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_application_fails_on_unreadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            default_pricing_path: dir.path().join("absent.json"),
            ..create_test_config()
        };

        assert!(Application::new(config).await.is_err());
    }

    #[tokio::test]
    async fn test_serve_returns_in_test_mode() {
        let file = pricing_file(r#"{"default_pricing": []}"#);
        let config = Config {
            default_pricing_path: file.path().to_path_buf(),
            port: 0,
            ..create_test_config()
        };

        let app = Application::new(config).await.unwrap();
        app.serve(std::future::pending()).await.unwrap();
    }

    #[tokio::test]
    async fn test_liveness_and_docs_routes() {
        let (server, _store) = crate::test_utils::create_test_app().await;

        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_text("hello world");

        server.get("/healthz").await.assert_text("OK");

        let doc: Value = server.get("/api-docs/openapi.json").await.json();
        assert_eq!(doc["info"]["title"], "Pricing API");
        assert!(doc["paths"]["/pricing-models"].is_object());

        let response = server.get("/docs").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[sqlx::test]
    async fn test_application_with_external_database(pool: PgPool) {
        use sqlx::ConnectOptions;

        let file = pricing_file(r#"{"default_pricing": []}"#);
        let config = Config {
            default_pricing_path: file.path().to_path_buf(),
            machines: vec!["gpu-01".to_string()],
            database: DatabaseConfig::External {
                url: pool.connect_options().to_url_lossy().to_string(),
                pool: Default::default(),
            },
            ..create_test_config()
        };

        let server = Application::new(config).await.unwrap().into_test_server();
        let response = server.post("/pricing-models").json(&serde_json::json!({"name": "A"})).await;
        response.assert_status(StatusCode::CREATED);
        server.get("/machines/1/prices").await.assert_status_ok();
    }
}
