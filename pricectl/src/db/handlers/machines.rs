//! Database repository for machines.

use crate::{
    db::{errors::Result, models::machines::Machine},
    types::{MachineId, PricingModelId},
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Machines<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Machines<'c> {
    /// Create a new Machines repository instance
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Get a machine by ID
    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: MachineId) -> Result<Option<Machine>> {
        let machine = sqlx::query_as::<_, Machine>("SELECT id, name, pricing_id FROM machine WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(machine)
    }

    /// Get a machine by ID, locking the row for update until the transaction ends
    #[instrument(skip(self), err)]
    pub async fn get_by_id_for_update(&mut self, id: MachineId) -> Result<Option<Machine>> {
        let machine = sqlx::query_as::<_, Machine>("SELECT id, name, pricing_id FROM machine WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(machine)
    }

    /// Point a machine at a pricing model
    #[instrument(skip(self), err)]
    pub async fn assign_pricing(&mut self, id: MachineId, pricing_id: PricingModelId) -> Result<Option<Machine>> {
        let machine = sqlx::query_as::<_, Machine>(
            r#"
            UPDATE machine
            SET pricing_id = $2
            WHERE id = $1
            RETURNING id, name, pricing_id
            "#,
        )
        .bind(id)
        .bind(pricing_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(machine)
    }

    /// Clear a machine's pricing model, but only if it currently references `pricing_id`.
    ///
    /// Returns `false` when the machine is missing or assigned to a different model.
    #[instrument(skip(self), err)]
    pub async fn detach_pricing(&mut self, id: MachineId, pricing_id: PricingModelId) -> Result<bool> {
        let result = sqlx::query("UPDATE machine SET pricing_id = NULL WHERE id = $1 AND pricing_id = $2")
            .bind(id)
            .bind(pricing_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Insert a machine by name if it does not exist yet, returning the stored row either way.
    ///
    /// An existing machine keeps its ID and pricing assignment.
    #[instrument(skip(self), err)]
    pub async fn ensure(&mut self, name: &str) -> Result<Machine> {
        let machine = sqlx::query_as::<_, Machine>(
            r#"
            INSERT INTO machine (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, pricing_id
            "#,
        )
        .bind(name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(machine)
    }
}
