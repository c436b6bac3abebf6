//! Errors

use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::NotFound => ApiError::not_found("Cart item not found"),
        CartsServiceError::UserNotFound => ApiError::not_found("User not found"),
        CartsServiceError::ProductNotFound => ApiError::not_found("Product not found"),
        CartsServiceError::InvalidInput(message) => ApiError::invalid_input(message),
        CartsServiceError::InsufficientStock { available, .. } => {
            ApiError::insufficient_stock(format!("Insufficient stock (available: {available})"))
        }
        CartsServiceError::Sql(source) => {
            error!("cart operation failed: {source}");

            ApiError::internal()
        }
    }
}
