//! PostgreSQL implementation of [`PricingStore`].
//!
//! Every operation runs in its own transaction. Parent rows are locked before
//! they are referenced (`FOR SHARE`) or mutated (`FOR UPDATE`), and detach
//! operations are single conditional updates, so existence checks cannot go
//! stale before the write commits.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::{MachineWithPrices, NewPrice, PricingModelWithPrices, PricingStore};
use crate::{
    db::{
        errors::DbError,
        handlers::{Machines, Prices, PricingModels},
        models::{
            machines::Machine,
            prices::{Price, PriceCreateDBRequest},
            pricing_models::{PricingModel, PricingModelCreateDBRequest, PricingModelUpdateDBRequest},
        },
    },
    errors::{Error, Result},
    types::{MachineId, PriceId, PricingModelId, Resource},
};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn list_pricing_models(&self) -> Result<Vec<PricingModelWithPrices>> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let models = PricingModels::new(&mut tx).list().await?;
        let ids: Vec<PricingModelId> = models.iter().map(|m| m.id).collect();
        let mut prices = Prices::new(&mut tx).list_by_pricing_models(&ids).await?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(models
            .into_iter()
            .map(|model| PricingModelWithPrices {
                prices: prices.remove(&model.id).unwrap_or_default(),
                model,
            })
            .collect())
    }

    #[instrument(skip(self), err)]
    async fn create_pricing_model(&self, name: &str) -> Result<PricingModel> {
        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        let request = PricingModelCreateDBRequest { name: name.to_string() };
        Ok(PricingModels::new(&mut conn).create(&request).await?)
    }

    #[instrument(skip(self), err)]
    async fn get_pricing_model(&self, id: PricingModelId) -> Result<PricingModelWithPrices> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let model = PricingModels::new(&mut tx)
            .get_by_id_for_share(id)
            .await?
            .ok_or_else(|| Error::not_found(Resource::PricingModel, id))?;
        let prices = Prices::new(&mut tx).list_by_pricing_model(id).await?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(PricingModelWithPrices { model, prices })
    }

    #[instrument(skip(self), err)]
    async fn rename_pricing_model(&self, id: PricingModelId, name: &str) -> Result<PricingModel> {
        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        let request = PricingModelUpdateDBRequest { name: name.to_string() };

        PricingModels::new(&mut conn)
            .update(id, &request)
            .await?
            .ok_or_else(|| Error::not_found(Resource::PricingModel, id))
    }

    #[instrument(skip(self), err)]
    async fn list_prices(&self, pricing_id: PricingModelId) -> Result<Vec<Price>> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        PricingModels::new(&mut tx)
            .get_by_id_for_share(pricing_id)
            .await?
            .ok_or_else(|| Error::not_found(Resource::PricingModel, pricing_id))?;
        let prices = Prices::new(&mut tx).list_by_pricing_model(pricing_id).await?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(prices)
    }

    #[instrument(skip(self, price), fields(name = %price.name), err)]
    async fn add_price(&self, pricing_id: PricingModelId, price: NewPrice) -> Result<(PricingModel, Price)> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let model = PricingModels::new(&mut tx)
            .get_by_id_for_share(pricing_id)
            .await?
            .ok_or_else(|| Error::not_found(Resource::PricingModel, pricing_id))?;

        let request = PriceCreateDBRequest {
            pricing_id,
            price: price.price,
            name: price.name,
            value: price.value,
        };
        let created = Prices::new(&mut tx).create(&request).await?;

        tx.commit().await.map_err(DbError::from)?;
        Ok((model, created))
    }

    #[instrument(skip(self), err)]
    async fn detach_price(&self, pricing_id: PricingModelId, price_id: PriceId) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        PricingModels::new(&mut tx)
            .get_by_id_for_share(pricing_id)
            .await?
            .ok_or_else(|| Error::not_found(Resource::PricingModel, pricing_id))?;

        if !Prices::new(&mut tx).detach(price_id, pricing_id).await? {
            return Err(Error::not_found(Resource::Price, price_id));
        }

        tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_price(&self, price_id: PriceId) -> Result<Option<Price>> {
        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        Ok(Prices::new(&mut conn).get_by_id(price_id).await?)
    }

    #[instrument(skip(self), err)]
    async fn assign_machine_pricing(&self, machine_id: MachineId, pricing_id: PricingModelId) -> Result<Machine> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        Machines::new(&mut tx)
            .get_by_id_for_update(machine_id)
            .await?
            .ok_or_else(|| Error::not_found(Resource::Machine, machine_id))?;
        PricingModels::new(&mut tx)
            .get_by_id_for_share(pricing_id)
            .await?
            .ok_or_else(|| Error::not_found(Resource::PricingModel, pricing_id))?;

        let machine = Machines::new(&mut tx)
            .assign_pricing(machine_id, pricing_id)
            .await?
            .ok_or_else(|| Error::not_found(Resource::Machine, machine_id))?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(machine)
    }

    #[instrument(skip(self), err)]
    async fn detach_machine_pricing(&self, machine_id: MachineId, pricing_id: PricingModelId) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;

        if Machines::new(&mut conn).detach_pricing(machine_id, pricing_id).await? {
            Ok(())
        } else {
            Err(Error::not_found(Resource::Machine, machine_id))
        }
    }

    #[instrument(skip(self), err)]
    async fn get_machine_pricing(&self, machine_id: MachineId) -> Result<MachineWithPrices> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let machine = Machines::new(&mut tx)
            .get_by_id(machine_id)
            .await?
            .ok_or_else(|| Error::not_found(Resource::Machine, machine_id))?;
        let prices = match machine.pricing_id {
            Some(pricing_id) => Prices::new(&mut tx).list_by_pricing_model(pricing_id).await?,
            None => Vec::new(),
        };

        tx.commit().await.map_err(DbError::from)?;
        Ok(MachineWithPrices { machine, prices })
    }

    #[instrument(skip(self), err)]
    async fn ensure_machine(&self, name: &str) -> Result<Machine> {
        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        Ok(Machines::new(&mut conn).ensure(name).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_price(name: &str, price: i64) -> NewPrice {
        NewPrice {
            price: Decimal::new(price, 0),
            name: name.to_string(),
            value: Decimal::new(25, 1),
        }
    }

    #[sqlx::test]
    async fn test_pricing_model_crud(pool: PgPool) {
        let store = PostgresStore::new(pool);

        let model = store.create_pricing_model("Standard").await.unwrap();
        let renamed = store.rename_pricing_model(model.id, "Premium").await.unwrap();
        assert_eq!(renamed.name, "Premium");

        let (_, price) = store.add_price(model.id, new_price("cpu", 7)).await.unwrap();
        assert_eq!(price.value, Decimal::new(25, 1));

        let fetched = store.get_pricing_model(model.id).await.unwrap();
        assert_eq!(fetched.model.name, "Premium");
        assert_eq!(fetched.prices, vec![price]);

        let listed = store.list_pricing_models().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].prices.len(), 1);
    }

    #[sqlx::test]
    async fn test_detach_price_nulls_association(pool: PgPool) {
        let store = PostgresStore::new(pool);
        let a = store.create_pricing_model("A").await.unwrap();
        let b = store.create_pricing_model("B").await.unwrap();
        let (_, price) = store.add_price(a.id, new_price("cpu", 1)).await.unwrap();

        let wrong_model = store.detach_price(b.id, price.id).await.unwrap_err();
        assert!(matches!(wrong_model, Error::NotFound { resource: Resource::Price, .. }));

        store.detach_price(a.id, price.id).await.unwrap();
        assert!(store.list_prices(a.id).await.unwrap().is_empty());

        let row = store.get_price(price.id).await.unwrap().unwrap();
        assert_eq!(row.pricing_id, None);
    }

    #[sqlx::test]
    async fn test_machine_assignment(pool: PgPool) {
        let store = PostgresStore::new(pool);
        let machine = store.ensure_machine("gpu-01").await.unwrap();
        let model = store.create_pricing_model("A").await.unwrap();

        let missing = store.assign_machine_pricing(machine.id, model.id + 100).await.unwrap_err();
        assert!(matches!(missing, Error::NotFound { resource: Resource::PricingModel, .. }));

        let assigned = store.assign_machine_pricing(machine.id, model.id).await.unwrap();
        assert_eq!(assigned.pricing_id, Some(model.id));
        assert_eq!(store.ensure_machine("gpu-01").await.unwrap(), assigned);

        store.detach_machine_pricing(machine.id, model.id).await.unwrap();
        let again = store.detach_machine_pricing(machine.id, model.id).await.unwrap_err();
        assert!(matches!(again, Error::NotFound { resource: Resource::Machine, .. }));
    }
}
