//! Inventory Repository

use sqlx::{Postgres, Transaction, query_scalar};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    database::{from_db_amount, to_db_amount},
    domain::{inventory::errors::InventoryError, products::records::ProductUuid},
};

const RESERVE_STOCK_SQL: &str = include_str!("sql/reserve_stock.sql");
const RELEASE_STOCK_SQL: &str = include_str!("sql/release_stock.sql");
const SET_STOCK_SQL: &str = include_str!("sql/set_stock.sql");
const GET_STOCK_SQL: &str = include_str!("sql/get_stock.sql");
const LOCK_PRODUCTS_SQL: &str = include_str!("sql/lock_products.sql");

/// Owns every write to `products.stock`.
#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Take `quantity` units out of stock, returning what remains.
    ///
    /// The check and the decrement are a single conditional `UPDATE`, so a
    /// failed reservation never touches the row.
    pub(crate) async fn reserve(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<u64, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::InvalidQuantity);
        }

        let remaining: Option<i64> = query_scalar::<Postgres, i64>(RESERVE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(to_db_amount(quantity, "stock")?)
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(remaining) = remaining {
            let remaining = from_db_amount(remaining, "stock")?;

            debug!(%product, quantity, remaining, "reserved stock");

            return Ok(remaining);
        }

        let available = self.stock(tx, product).await?;

        warn!(%product, requested = quantity, available, "reservation rejected");

        Err(InventoryError::InsufficientStock {
            requested: quantity,
            available,
        })
    }

    /// Return `quantity` units to stock, returning the new level.
    pub(crate) async fn release(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<u64, InventoryError> {
        if quantity == 0 {
            return self.stock(tx, product).await;
        }

        let stock: i64 = query_scalar::<Postgres, i64>(RELEASE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(to_db_amount(quantity, "stock")?)
            .fetch_one(&mut **tx)
            .await?;

        let stock = from_db_amount(stock, "stock")?;

        debug!(%product, quantity, stock, "released stock");

        Ok(stock)
    }

    /// Overwrite the stock level.
    pub(crate) async fn set_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        stock: u64,
    ) -> Result<u64, InventoryError> {
        let stock: i64 = query_scalar::<Postgres, i64>(SET_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(to_db_amount(stock, "stock")?)
            .fetch_one(&mut **tx)
            .await?;

        Ok(from_db_amount(stock, "stock")?)
    }

    pub(crate) async fn stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, InventoryError> {
        let stock: i64 = query_scalar::<Postgres, i64>(GET_STOCK_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(from_db_amount(stock, "stock")?)
    }

    /// Lock product rows in uuid order for the rest of the transaction.
    ///
    /// Returns the uuids that exist; missing products are silently skipped.
    pub(crate) async fn lock_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductUuid>, InventoryError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = products.iter().copied().map(ProductUuid::into_uuid).collect();

        let locked = query_scalar::<Postgres, Uuid>(LOCK_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        Ok(locked.into_iter().map(ProductUuid::from_uuid).collect())
    }
}
