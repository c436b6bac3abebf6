//! Delete Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{errors::ApiError, extensions::*, products::errors::into_api_error, state::State};

/// Product Deleted Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductDeletedResponse {
    /// What happened
    pub message: String,
}

/// Delete Product Handler
///
/// Deletes a product along with any cart lines holding it.
#[endpoint(
    tags("products"),
    summary = "Delete Product",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ProductDeletedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = path_uuid(id)?;

    state
        .app
        .products
        .delete_product(product)
        .await
        .map_err(into_api_error)?;

    Ok(Json(ProductDeletedResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
