//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::{data::ProductUpdate, records::ProductUuid};

use crate::{
    errors::ApiError,
    extensions::*,
    products::{
        errors::into_api_error,
        handlers::{ProductMessageResponse, ProductResponse},
    },
    state::State,
};

/// Update Product Request
///
/// Omitted fields keep their current value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u64>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
        }
    }
}

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    name = "products.update",
    skip(id, req, depot),
    fields(
        product_uuid = tracing::field::Empty,
        stock = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ProductMessageResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product: ProductUuid = path_uuid(id)?;
    let request: UpdateProductRequest = json_body(req).await?;

    let span = tracing::Span::current();

    span.record("product_uuid", tracing::field::display(product));

    if let Some(stock) = request.stock {
        span.record("stock", stock);
    }

    let product = state
        .app
        .products
        .update_product(product, request.into())
        .await
        .map_err(into_api_error)?;

    tracing::info!(product_uuid = %product.uuid, price = product.price, "updated product");

    Ok(Json(ProductMessageResponse {
        message: "Product updated successfully".to_string(),
        product: ProductResponse::from(product),
    }))
}
