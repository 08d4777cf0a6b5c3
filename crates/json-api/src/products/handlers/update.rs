//! Update Product Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{ProductRequest, ProductResponse},
    },
    state::State,
};

/// Update Product Handler
///
/// Replaces every editable field of the product.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .catalog
        .update_product(product.into_inner().into(), json.into_inner().try_into()?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductResponse::at(product, Timestamp::now())))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use ostrum_app::domain::catalog::{CatalogServiceError, records::ProductUuid};

    use crate::{
        products::models::fixtures::{make_product, product_request},
        test_helpers::Mocks,
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.admin_service(Router::with_path("admin/products/{product}").put(handler))
    }

    #[tokio::test]
    async fn test_update_product_success() -> TestResult {
        let uuid = ProductUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_update_product()
            .once()
            .withf(move |product, details| {
                *product == uuid && details.price == Decimal::from(250)
            })
            .return_once(move |_, details| {
                let mut product = make_product(uuid);
                product.price = details.price;
                product.discount = None;

                Ok(product)
            });

        let request = ProductRequest {
            price: "250".to_string(),
            ..product_request()
        };

        let response: ProductResponse =
            TestClient::put(format!("http://example.com/admin/products/{uuid}"))
                .json(&request)
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        assert_eq!(response.price, "250");
        assert_eq!(response.sale_price, "250");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let uuid = ProductUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_update_product()
            .once()
            .return_once(|_, _| Err(CatalogServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/admin/products/{uuid}"))
            .json(&product_request())
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
