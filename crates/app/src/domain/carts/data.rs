//! Cart Data

use crate::domain::products::records::ProductUuid;

/// Request to put a product into a cart.
///
/// Fields arrive unvalidated; the carts service rejects a missing product or a
/// non-positive quantity before touching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddCartItem {
    pub product: Option<ProductUuid>,

    /// Units to add; `None` means one.
    pub quantity: Option<i64>,
}
