//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::inventory::InventoryError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart item not found")]
    NotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("product not found")]
    ProductNotFound,

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("insufficient stock (available: {available})")]
    InsufficientStock { requested: u64, available: u64 },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::ProductNotFound,
            Some(ErrorKind::CheckViolation) => Self::InvalidInput("quantity is out of range"),
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<InventoryError> for CartsServiceError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::NotFound => Self::ProductNotFound,
            InventoryError::InsufficientStock {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
            InventoryError::InvalidQuantity => {
                Self::InvalidInput("quantity must be greater than zero")
            }
            InventoryError::Sql(source) => Self::from(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_shortfall_keeps_available_count() {
        let error = CartsServiceError::from(InventoryError::InsufficientStock {
            requested: 3,
            available: 1,
        });

        assert_eq!(error.to_string(), "insufficient stock (available: 1)");
    }

    #[test]
    fn missing_inventory_row_is_a_missing_product() {
        assert!(matches!(
            CartsServiceError::from(InventoryError::NotFound),
            CartsServiceError::ProductNotFound
        ));
    }
}
