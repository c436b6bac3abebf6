//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    carts::{errors::into_api_error, handlers::MessageResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Deletes a line and returns its quantity to stock.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let line = path_uuid_or_not_found(id, "Cart item not found")?;

    state
        .app
        .carts
        .remove_item(user, line)
        .await
        .map_err(into_api_error)?;

    Ok(Json(MessageResponse {
        message: "Item removed from cart".to_string(),
    }))
}
