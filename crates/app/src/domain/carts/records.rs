//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// A stored `(user, product) -> quantity` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineRecord {
    pub uuid: CartLineUuid,
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line joined with the product's current name and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub uuid: CartLineUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub unit_price: u64,
    pub quantity: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItem {
    /// `quantity × unit_price`, saturating at `u64::MAX`.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// A user's cart, priced at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    /// Lines in the order they were first added.
    pub items: Vec<CartItem>,

    /// Number of distinct lines.
    pub total_items: u64,

    /// Sum of line quantities.
    pub total_quantity: u64,

    /// Sum of line subtotals in minor currency units.
    pub total_price: u64,
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        let total_items = u64::try_from(items.len()).unwrap_or(u64::MAX);

        let (total_quantity, total_price) =
            items.iter().fold((0_u64, 0_u64), |(quantity, price), item| {
                (
                    quantity.saturating_add(item.quantity),
                    price.saturating_add(item.subtotal()),
                )
            });

        Self {
            items,
            total_items,
            total_quantity,
            total_price,
        }
    }
}
