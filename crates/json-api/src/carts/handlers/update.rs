//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    carts::{
        errors::into_api_error,
        handlers::{CartItemMessageResponse, CartItemResponse},
    },
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity, must be positive
    pub quantity: i64,
}

/// Update Cart Item Handler
///
/// Sets a line's quantity, reserving or releasing the difference.
#[endpoint(
    tags("cart"),
    summary = "Update Cart Item",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartItemMessageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let line = path_uuid_or_not_found(id, "Cart item not found")?;
    let request: UpdateCartItemRequest = json_body(req).await?;

    let item = state
        .app
        .carts
        .update_item(user, line, request.quantity)
        .await
        .map_err(into_api_error)?;

    Ok(Json(CartItemMessageResponse {
        message: "Cart item updated".to_string(),
        item: CartItemResponse::from(item),
    }))
}
