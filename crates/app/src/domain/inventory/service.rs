//! Inventory service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        inventory::{errors::InventoryError, repository::PgInventoryRepository},
        products::records::ProductUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgInventoryService {
    db: Db,
    repository: PgInventoryRepository,
}

impl PgInventoryService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl InventoryService for PgInventoryService {
    async fn reserve(&self, product: ProductUuid, quantity: u64) -> Result<u64, InventoryError> {
        let mut tx = self.db.begin().await?;

        let remaining = self.repository.reserve(&mut tx, product, quantity).await?;

        tx.commit().await?;

        Ok(remaining)
    }

    async fn release(&self, product: ProductUuid, quantity: u64) -> Result<u64, InventoryError> {
        let mut tx = self.db.begin().await?;

        let stock = self.repository.release(&mut tx, product, quantity).await?;

        tx.commit().await?;

        Ok(stock)
    }

    async fn stock(&self, product: ProductUuid) -> Result<u64, InventoryError> {
        let mut tx = self.db.begin().await?;

        let stock = self.repository.stock(&mut tx, product).await?;

        tx.commit().await?;

        Ok(stock)
    }
}

/// Authoritative stock counts.
#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Atomically take `quantity` units of `product`, returning the remaining stock.
    ///
    /// Nothing changes when the reservation fails.
    async fn reserve(&self, product: ProductUuid, quantity: u64) -> Result<u64, InventoryError>;

    /// Return `quantity` units of `product`, returning the new stock level.
    async fn release(&self, product: ProductUuid, quantity: u64) -> Result<u64, InventoryError>;

    /// Current stock level of `product`.
    async fn stock(&self, product: ProductUuid) -> Result<u64, InventoryError>;
}
