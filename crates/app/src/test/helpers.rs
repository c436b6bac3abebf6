//! Test Helpers

use crate::{
    domain::{
        carts::{CartsService, CartsServiceError, data::AddCartItem, records::CartItem},
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        users::{UsersService, UsersServiceError, data::NewUser, records::UserUuid},
    },
    test::TestContext,
};

pub(crate) async fn create_user(ctx: &TestContext) -> Result<UserUuid, UsersServiceError> {
    let uuid = UserUuid::new();

    ctx.users
        .create_user(NewUser {
            uuid,
            email: format!("{uuid}@example.com"),
        })
        .await
        .map(|user| user.uuid)
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    price: u64,
    stock: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    let uuid = ProductUuid::new();

    ctx.products
        .create_product(NewProduct {
            uuid,
            name: format!("Product {uuid}"),
            description: String::new(),
            price,
            stock,
        })
        .await
}

pub(crate) async fn add_item(
    ctx: &TestContext,
    user: UserUuid,
    product: ProductUuid,
    quantity: Option<i64>,
) -> Result<CartItem, CartsServiceError> {
    ctx.carts
        .add_item(
            user,
            AddCartItem {
                product: Some(product),
                quantity,
            },
        )
        .await
}
