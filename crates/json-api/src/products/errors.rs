//! Product Errors

use tracing::error;

use storefront_app::domain::products::ProductsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: ProductsServiceError) -> ApiError {
    match error {
        ProductsServiceError::AlreadyExists => ApiError::conflict("Product already exists"),
        ProductsServiceError::NotFound => ApiError::not_found("Product not found"),
        ProductsServiceError::MissingRequiredData => {
            ApiError::invalid_input("Missing required fields")
        }
        ProductsServiceError::InvalidData => ApiError::invalid_input("Invalid product data"),
        ProductsServiceError::Sql(source) => {
            error!("product operation failed: {source}");

            ApiError::internal()
        }
    }
}
