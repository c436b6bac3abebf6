//! Carts service.
//!
//! Every mutation runs in one transaction that pairs the cart line change with
//! the matching inventory reservation or release. An error anywhere drops the
//! transaction, rolling both back together.
//!
//! Row locks are always taken product first (in uuid order), then cart line.

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::AddCartItem,
            errors::CartsServiceError,
            records::{Cart, CartItem, CartLineRecord, CartLineUuid},
            repositories::PgCartLinesRepository,
        },
        inventory::repository::PgInventoryRepository,
        users::{records::UserUuid, repository::PgUsersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    lines: PgCartLinesRepository,
    inventory: PgInventoryRepository,
    users: PgUsersRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            lines: PgCartLinesRepository::new(),
            inventory: PgInventoryRepository::new(),
            users: PgUsersRepository::new(),
        }
    }
}

fn positive_quantity(quantity: i64) -> Result<u64, CartsServiceError> {
    u64::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or(CartsServiceError::InvalidInput(
            "quantity must be greater than zero",
        ))
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if !self.users.user_exists(&mut tx, user).await? {
            return Err(CartsServiceError::UserNotFound);
        }

        let items = self.lines.get_cart_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(Cart::from(items))
    }

    async fn add_item(
        &self,
        user: UserUuid,
        item: AddCartItem,
    ) -> Result<CartItem, CartsServiceError> {
        let product = item
            .product
            .ok_or(CartsServiceError::InvalidInput("product_id is required"))?;

        let mut tx = self.db.begin().await?;

        if !self.users.user_exists(&mut tx, user).await? {
            return Err(CartsServiceError::UserNotFound);
        }

        // An unknown product outranks a bad quantity.
        self.inventory.stock(&mut tx, product).await?;

        let quantity = positive_quantity(item.quantity.unwrap_or(1))?;

        self.inventory.reserve(&mut tx, product, quantity).await?;

        let line = self
            .lines
            .upsert_line(&mut tx, user, product, quantity)
            .await?;

        let added = self.lines.get_cart_item(&mut tx, line.uuid, user).await?;

        tx.commit().await?;

        info!(%user, %product, quantity, line = %added.uuid, "added to cart");

        Ok(added)
    }

    async fn update_item(
        &self,
        user: UserUuid,
        line: CartLineUuid,
        quantity: i64,
    ) -> Result<CartItem, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.lines.find_line(&mut tx, line, user).await?.product_uuid;

        let new_quantity = positive_quantity(quantity)?;

        self.inventory.lock_products(&mut tx, &[product]).await?;

        let current = self.lines.find_line_for_update(&mut tx, line, user).await?;

        if new_quantity > current.quantity {
            self.inventory
                .reserve(&mut tx, product, new_quantity - current.quantity)
                .await?;

            self.lines
                .set_quantity(&mut tx, line, user, new_quantity)
                .await?;
        } else if new_quantity < current.quantity {
            self.lines
                .set_quantity(&mut tx, line, user, new_quantity)
                .await?;

            self.inventory
                .release(&mut tx, product, current.quantity - new_quantity)
                .await?;
        }

        let updated = self.lines.get_cart_item(&mut tx, line, user).await?;

        tx.commit().await?;

        debug!(
            %user,
            %line,
            from = current.quantity,
            to = new_quantity,
            "updated cart line"
        );

        Ok(updated)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.lines.find_line(&mut tx, line, user).await?.product_uuid;

        self.inventory.lock_products(&mut tx, &[product]).await?;

        let removed = self.lines.remove_line(&mut tx, line, user).await?;

        self.inventory
            .release(&mut tx, removed.product_uuid, removed.quantity)
            .await?;

        tx.commit().await?;

        info!(%user, %line, quantity = removed.quantity, "removed from cart");

        Ok(removed)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.lines.get_cart_products(&mut tx, user).await?;

        self.inventory.lock_products(&mut tx, &products).await?;

        let removed = self.lines.clear_lines(&mut tx, user).await?;

        for line in &removed {
            self.inventory
                .release(&mut tx, line.product_uuid, line.quantity)
                .await?;
        }

        tx.commit().await?;

        let removed = u64::try_from(removed.len()).unwrap_or(u64::MAX);

        info!(%user, removed, "cleared cart");

        Ok(removed)
    }
}

/// Per-user shopping cart operations.
///
/// Callers pass the authenticated user explicitly; a user can only ever see or
/// change their own lines.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The user's cart, priced with current product prices.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Reserve stock and add it to the user's line for the product.
    async fn add_item(
        &self,
        user: UserUuid,
        item: AddCartItem,
    ) -> Result<CartItem, CartsServiceError>;

    /// Set a line's quantity, reserving or releasing the difference.
    async fn update_item(
        &self,
        user: UserUuid,
        line: CartLineUuid,
        quantity: i64,
    ) -> Result<CartItem, CartsServiceError>;

    /// Delete a line and return its quantity to stock.
    async fn remove_item(
        &self,
        user: UserUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Delete every line, returning all reserved stock. Returns the number of
    /// lines removed.
    async fn clear_cart(&self, user: UserUuid) -> Result<u64, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            inventory::InventoryService,
            products::{ProductsService, data::ProductUpdate, records::ProductUuid},
        },
        test::{
            TestContext,
            helpers::{add_item, create_product, create_user},
        },
    };

    use super::*;

    #[tokio::test]
    async fn new_user_has_an_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart, Cart::default());

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_cart_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.get_cart(UserUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::UserNotFound)),
            "expected UserNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn adding_same_product_twice_merges_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 10).await?;

        let first = add_item(&ctx, user, product.uuid, Some(2)).await?;
        let second = add_item(&ctx, user, product.uuid, Some(3)).await?;

        assert_eq!(first.uuid, second.uuid, "same line is reused");
        assert_eq!(second.quantity, 5);

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.total_items, 1);
        assert_eq!(cart.total_quantity, 5);
        assert_eq!(cart.total_price, 2_000);
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 5);

        Ok(())
    }

    #[tokio::test]
    async fn add_defaults_quantity_to_one() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 3).await?;

        let item = add_item(&ctx, user, product.uuid, None).await?;

        assert_eq!(item.quantity, 1);
        assert_eq!(item.product_name, product.name);
        assert_eq!(item.unit_price, 400);
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn add_rejects_non_positive_quantity_without_mutation() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 3).await?;

        for quantity in [0, -2] {
            let result = add_item(&ctx, user, product.uuid, Some(quantity)).await;

            assert!(
                matches!(result, Err(CartsServiceError::InvalidInput(_))),
                "expected InvalidInput for {quantity}, got {result:?}"
            );
        }

        assert_eq!(ctx.inventory.stock(product.uuid).await?, 3);
        assert!(ctx.carts.get_cart(user).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn add_requires_a_product() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;

        let result = ctx
            .carts
            .add_item(
                user,
                AddCartItem {
                    product: None,
                    quantity: Some(1),
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_product_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;

        let result = add_item(&ctx, user, ProductUuid::new(), Some(1)).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_product_with_zero_quantity_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;

        let result = add_item(&ctx, user, ProductUuid::new(), Some(0)).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_for_unknown_user_leaves_stock_alone() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 400, 3).await?;

        let result = add_item(&ctx, UserUuid::new(), product.uuid, Some(1)).await;

        assert!(
            matches!(result, Err(CartsServiceError::UserNotFound)),
            "expected UserNotFound, got {result:?}"
        );
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn add_beyond_stock_is_rejected_without_mutation() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 2).await?;

        let result = add_item(&ctx, user, product.uuid, Some(3)).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock { available: 2, .. })
            ),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 2);
        assert!(ctx.carts.get_cart(user).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_for_the_last_unit_never_oversell() -> TestResult {
        let ctx = TestContext::new().await;
        let alice = create_user(&ctx).await?;
        let bob = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 1).await?;

        let (first, second) = tokio::join!(
            add_item(&ctx, alice, product.uuid, Some(1)),
            add_item(&ctx, bob, product.uuid, Some(1)),
        );

        let outcomes = [first, second];

        let added = outcomes.iter().filter(|result| result.is_ok()).count();
        let rejected = outcomes
            .iter()
            .filter(|result| matches!(result, Err(CartsServiceError::InsufficientStock { .. })))
            .count();

        assert_eq!(added, 1, "exactly one add should succeed");
        assert_eq!(rejected, 1, "the other add should run out of stock");
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn add_update_remove_keeps_stock_consistent() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 5).await?;

        let line = add_item(&ctx, user, product.uuid, Some(3)).await?;
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 2);

        let updated = ctx.carts.update_item(user, line.uuid, 1).await?;
        assert_eq!(updated.quantity, 1);
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 4);

        let updated = ctx.carts.update_item(user, line.uuid, 4).await?;
        assert_eq!(updated.quantity, 4);
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 1);

        let removed = ctx.carts.remove_item(user, line.uuid).await?;
        assert_eq!(removed.quantity, 4);
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 5);

        assert!(ctx.carts.get_cart(user).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_to_same_quantity_is_a_no_op() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 5).await?;

        let line = add_item(&ctx, user, product.uuid, Some(2)).await?;
        let updated = ctx.carts.update_item(user, line.uuid, 2).await?;

        assert_eq!(updated.quantity, 2);
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn update_beyond_stock_keeps_line_and_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 3).await?;

        let line = add_item(&ctx, user, product.uuid, Some(2)).await?;
        let result = ctx.carts.update_item(user, line.uuid, 10).await;

        assert!(
            matches!(result, Err(CartsServiceError::InsufficientStock { .. })),
            "expected InsufficientStock, got {result:?}"
        );

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.total_quantity, 2);
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn update_to_zero_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 3).await?;

        let line = add_item(&ctx, user, product.uuid, Some(2)).await?;
        let result = ctx.carts.update_item(user, line.uuid, 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn update_unknown_line_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;

        let result = ctx.carts.update_item(user, CartLineUuid::new(), 0).await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn other_users_lines_are_invisible() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = create_user(&ctx).await?;
        let intruder = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 5).await?;

        let line = add_item(&ctx, owner, product.uuid, Some(2)).await?;

        assert!(ctx.carts.get_cart(intruder).await?.items.is_empty());

        assert!(matches!(
            ctx.carts.update_item(intruder, line.uuid, 1).await,
            Err(CartsServiceError::NotFound)
        ));

        assert!(matches!(
            ctx.carts.remove_item(intruder, line.uuid).await,
            Err(CartsServiceError::NotFound)
        ));

        assert_eq!(ctx.carts.clear_cart(intruder).await?, 0);

        let cart = ctx.carts.get_cart(owner).await?;

        assert_eq!(cart.total_quantity, 2);
        assert_eq!(ctx.inventory.stock(product.uuid).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_releases_every_line() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let mug = create_product(&ctx, 400, 5).await?;
        let pen = create_product(&ctx, 150, 8).await?;

        add_item(&ctx, user, mug.uuid, Some(2)).await?;
        add_item(&ctx, user, pen.uuid, Some(6)).await?;

        assert_eq!(ctx.carts.clear_cart(user).await?, 2);

        assert_eq!(ctx.inventory.stock(mug.uuid).await?, 5);
        assert_eq!(ctx.inventory.stock(pen.uuid).await?, 8);
        assert!(ctx.carts.get_cart(user).await?.items.is_empty());

        assert_eq!(ctx.carts.clear_cart(user).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn cart_is_priced_at_read_time() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let product = create_product(&ctx, 400, 5).await?;

        add_item(&ctx, user, product.uuid, Some(2)).await?;

        ctx.products
            .update_product(
                product.uuid,
                ProductUpdate {
                    price: Some(500),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        let cart = ctx.carts.get_cart(user).await?;

        assert_eq!(cart.total_price, 1_000);

        Ok(())
    }

    #[tokio::test]
    async fn lines_are_listed_in_insertion_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx).await?;
        let first = create_product(&ctx, 100, 5).await?;
        let second = create_product(&ctx, 200, 5).await?;

        add_item(&ctx, user, second.uuid, Some(1)).await?;
        add_item(&ctx, user, first.uuid, Some(1)).await?;
        add_item(&ctx, user, second.uuid, Some(1)).await?;

        let products: Vec<ProductUuid> = ctx
            .carts
            .get_cart(user)
            .await?
            .items
            .iter()
            .map(|item| item.product_uuid)
            .collect();

        assert_eq!(products, vec![second.uuid, first.uuid]);

        Ok(())
    }
}
