//! Test utilities for handler and application tests.

use std::sync::Arc;

use axum_test::TestServer;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    AppState,
    api::models::prices::PriceEntry,
    build_router,
    config::{Config, DatabaseConfig},
    db::models::pricing_models::PricingModel,
    pricing_defaults::DefaultPricing,
    store::{InMemoryStore, PostgresStore, PricingStore},
};

/// Router over a fresh in-memory store, with [`default_pricing_fixture`] as the defaults.
///
/// The returned store shares its tables with the server, for seeding and assertions.
pub async fn create_test_app() -> (TestServer, InMemoryStore) {
    let store = InMemoryStore::new();
    let server = create_test_server(Arc::new(store.clone()));
    (server, store)
}

/// Router over a migrated `#[sqlx::test]` pool, with [`default_pricing_fixture`] as the defaults.
pub async fn create_pg_test_app(pool: PgPool) -> (TestServer, PostgresStore) {
    let store = PostgresStore::new(pool);
    let server = create_test_server(Arc::new(store.clone()));
    (server, store)
}

fn create_test_server(store: Arc<dyn PricingStore>) -> TestServer {
    let state = AppState::builder()
        .store(store)
        .default_pricing(DefaultPricing::new(default_pricing_fixture()))
        .config(create_test_config())
        .build();

    TestServer::new(build_router(state)).expect("Failed to create test server")
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        test_mode: true,
        ..Default::default()
    }
}

pub fn default_pricing_fixture() -> Vec<PriceEntry> {
    vec![
        PriceEntry {
            price: Decimal::new(5, 1),
            name: "cpu".to_string(),
            value: Decimal::new(1, 0),
        },
        PriceEntry {
            price: Decimal::new(125, 2),
            name: "gpu".to_string(),
            value: Decimal::new(1, 0),
        },
    ]
}

pub async fn seed_pricing_model(store: &dyn PricingStore, name: &str) -> PricingModel {
    store.create_pricing_model(name).await.expect("Failed to create pricing model")
}
