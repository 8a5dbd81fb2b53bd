//! Database repository for pricing models.

use crate::{
    db::{
        errors::Result,
        models::pricing_models::{PricingModel, PricingModelCreateDBRequest, PricingModelUpdateDBRequest},
    },
    types::PricingModelId,
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct PricingModels<'c> {
    db: &'c mut PgConnection,
}

impl<'c> PricingModels<'c> {
    /// Create a new PricingModels repository instance
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert a new pricing model
    #[instrument(skip(self, request), fields(name = %request.name), err)]
    pub async fn create(&mut self, request: &PricingModelCreateDBRequest) -> Result<PricingModel> {
        let model = sqlx::query_as::<_, PricingModel>(
            r#"
            INSERT INTO pricing (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(&request.name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(model)
    }

    /// Get a pricing model by ID, holding a share lock on the row until the transaction ends.
    ///
    /// Concurrent deletes (and key updates) of the row block until the caller commits,
    /// so a price or machine can be pointed at it without a race.
    #[instrument(skip(self), err)]
    pub async fn get_by_id_for_share(&mut self, id: PricingModelId) -> Result<Option<PricingModel>> {
        let model = sqlx::query_as::<_, PricingModel>("SELECT id, name FROM pricing WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(model)
    }

    /// List all pricing models, oldest first
    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<PricingModel>> {
        let models = sqlx::query_as::<_, PricingModel>("SELECT id, name FROM pricing ORDER BY id ASC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(models)
    }

    /// Rename a pricing model. Returns `None` when no row has the given ID.
    #[instrument(skip(self, request), fields(name = %request.name), err)]
    pub async fn update(&mut self, id: PricingModelId, request: &PricingModelUpdateDBRequest) -> Result<Option<PricingModel>> {
        let model = sqlx::query_as::<_, PricingModel>(
            r#"
            UPDATE pricing
            SET name = $2
            WHERE id = $1
            RETURNING id, name
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(model)
    }
}
