//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{carts::data::AddCartItem, products::records::ProductUuid};

use crate::{
    carts::{
        errors::into_api_error,
        handlers::{CartItemMessageResponse, CartItemResponse},
    },
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// Product to add
    pub product_id: Option<Uuid>,

    /// Units to add, defaults to one
    pub quantity: Option<i64>,
}

impl From<AddCartItemRequest> for AddCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        Self {
            product: request.product_id.map(ProductUuid::from_uuid),
            quantity: request.quantity,
        }
    }
}

/// Add Cart Item Handler
///
/// Reserves stock and adds it to the caller's line for the product, creating
/// the line if needed.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemMessageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let request: AddCartItemRequest = json_body(req).await?;

    let item = state
        .app
        .carts
        .add_item(user, request.into())
        .await
        .map_err(into_api_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(CartItemMessageResponse {
        message: "Product added to cart".to_string(),
        item: CartItemResponse::from(item),
    }))
}
