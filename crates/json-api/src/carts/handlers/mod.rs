//! Cart Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::records::CartItem;

pub(crate) mod add;
pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove;
pub(crate) mod update;

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart line
    pub id: Uuid,

    /// The product in this line
    pub product_id: Uuid,

    /// The product's current name
    pub product_name: String,

    /// The product's current unit price, in minor currency units
    pub unit_price: u64,

    /// Units held in the cart
    pub quantity: u64,

    /// `unit_price × quantity`
    pub subtotal: u64,

    /// The date and time the line was created
    pub created_at: String,

    /// The date and time the line was last updated
    pub updated_at: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.uuid.into_uuid(),
            product_id: item.product_uuid.into_uuid(),
            subtotal: item.subtotal(),
            product_name: item.product_name,
            unit_price: item.unit_price,
            quantity: item.quantity,
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Cart Item Message Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemMessageResponse {
    /// What happened
    pub message: String,

    /// The line after the change
    pub item: CartItemResponse,
}

/// Message Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    /// What happened
    pub message: String,
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use storefront_app::domain::{
        carts::records::{CartItem, CartLineUuid},
        products::records::ProductUuid,
    };

    pub(super) fn make_item(uuid: CartLineUuid, quantity: u64) -> CartItem {
        CartItem {
            uuid,
            product_uuid: ProductUuid::new(),
            product_name: "Widget".to_string(),
            unit_price: 250,
            quantity,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
