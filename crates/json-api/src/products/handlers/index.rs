//! Product Index Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, products::models::ProductResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns the storefront, optionally narrowed to one category or to the products offered on
/// one server.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    server: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let now = Timestamp::now();

    let products = state
        .app
        .catalog
        .list_products()
        .await
        .or_500("failed to fetch products")?;

    let category = category.into_inner();
    let server = server.into_inner();

    Ok(Json(ProductsResponse {
        products: products
            .into_iter()
            .filter(|product| {
                category
                    .as_deref()
                    .is_none_or(|category| product.category.as_deref() == Some(category))
            })
            .filter(|product| {
                server
                    .as_deref()
                    .is_none_or(|server| product.is_offered_on(server))
            })
            .map(|product| ProductResponse::at(product, now))
            .collect(),
    }))
}
