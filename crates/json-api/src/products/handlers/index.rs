//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::products::data::{Page, ProductPage};

use crate::{
    errors::ApiError,
    extensions::*,
    products::{errors::into_api_error, handlers::ProductResponse},
    state::State,
};

/// Products Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The products on this page
    pub products: Vec<ProductResponse>,

    /// Number of products in the catalog
    pub total: u64,

    /// Number of pages at the current page size
    pub pages: u64,

    /// The page returned
    pub current_page: u32,
}

impl From<ProductPage> for ProductsResponse {
    fn from(page: ProductPage) -> Self {
        Self {
            total: page.total,
            pages: page.pages(),
            current_page: page.page.number(),
            products: page.products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Product Index Handler
///
/// Returns one page of products, oldest first.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<String, false>,
    per_page: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let page = Page::new(query_number(page), query_number(per_page));

    let products = state
        .app
        .products
        .list_products(page)
        .await
        .map_err(into_api_error)?;

    Ok(Json(products.into()))
}
