//! Clear Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{carts::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Cart Cleared Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartClearedResponse {
    /// What happened
    pub message: String,

    /// Number of lines removed
    pub removed: u64,
}

/// Clear Cart Handler
///
/// Removes every line from the caller's cart, returning all reserved stock.
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartClearedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let removed = state
        .app
        .carts
        .clear_cart(user)
        .await
        .map_err(into_api_error)?;

    Ok(Json(CartClearedResponse {
        message: "Cart cleared".to_string(),
        removed,
    }))
}
