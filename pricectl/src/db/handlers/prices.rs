//! Database repository for price lines.

use std::collections::HashMap;

use crate::{
    db::{
        errors::Result,
        models::prices::{Price, PriceCreateDBRequest},
    },
    types::{PriceId, PricingModelId},
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Prices<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Prices<'c> {
    /// Create a new Prices repository instance
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert a new price attached to a pricing model
    #[instrument(skip(self, request), fields(pricing_id = request.pricing_id, name = %request.name), err)]
    pub async fn create(&mut self, request: &PriceCreateDBRequest) -> Result<Price> {
        let price = sqlx::query_as::<_, Price>(
            r#"
            INSERT INTO price (price, name, value, pricing_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, price, name, value, pricing_id
            "#,
        )
        .bind(request.price)
        .bind(&request.name)
        .bind(request.value)
        .bind(request.pricing_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(price)
    }

    /// Get a price by ID, attached or not
    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: PriceId) -> Result<Option<Price>> {
        let price = sqlx::query_as::<_, Price>("SELECT id, price, name, value, pricing_id FROM price WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(price)
    }

    /// List the prices currently attached to a pricing model
    #[instrument(skip(self), err)]
    pub async fn list_by_pricing_model(&mut self, pricing_id: PricingModelId) -> Result<Vec<Price>> {
        let prices = sqlx::query_as::<_, Price>(
            r#"
            SELECT id, price, name, value, pricing_id
            FROM price
            WHERE pricing_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(pricing_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(prices)
    }

    /// List the attached prices of several pricing models in one round trip, grouped by model
    #[instrument(skip(self, pricing_ids), fields(count = pricing_ids.len()), err)]
    pub async fn list_by_pricing_models(&mut self, pricing_ids: &[PricingModelId]) -> Result<HashMap<PricingModelId, Vec<Price>>> {
        let prices = sqlx::query_as::<_, Price>(
            r#"
            SELECT id, price, name, value, pricing_id
            FROM price
            WHERE pricing_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(pricing_ids)
        .fetch_all(&mut *self.db)
        .await?;

        let mut grouped: HashMap<PricingModelId, Vec<Price>> = HashMap::new();
        for price in prices {
            if let Some(pricing_id) = price.pricing_id {
                grouped.entry(pricing_id).or_default().push(price);
            }
        }

        Ok(grouped)
    }

    /// Detach a price from the given pricing model.
    ///
    /// Returns `false` if the price does not exist or is not attached to that model.
    #[instrument(skip(self), err)]
    pub async fn detach(&mut self, id: PriceId, pricing_id: PricingModelId) -> Result<bool> {
        let result = sqlx::query("UPDATE price SET pricing_id = NULL WHERE id = $1 AND pricing_id = $2")
            .bind(id)
            .bind(pricing_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
