//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::carts::records::Cart;

use crate::{
    carts::{errors::into_api_error, handlers::CartItemResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Lines in the order they were first added
    pub items: Vec<CartItemResponse>,

    /// Number of distinct lines
    pub total_items: u64,

    /// Sum of line quantities
    pub total_quantity: u64,

    /// Sum of line subtotals, in minor currency units
    pub total_price: u64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            total_items: cart.total_items,
            total_quantity: cart.total_quantity,
            total_price: cart.total_price,
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart priced with current product prices.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user)
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}
