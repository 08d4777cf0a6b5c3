//! Create Product Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use ostrum_app::domain::catalog::{data::NewProduct, records::ProductUuid};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{ProductRequest, ProductResponse},
    },
    state::State,
};

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .catalog
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            details: json.into_inner().try_into()?,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(ProductResponse::at(product, Timestamp::now())))
}

#[cfg(test)]
mod tests {
    use ostrum::currency::Currency;
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use ostrum_app::domain::catalog::CatalogServiceError;

    use crate::{
        products::models::fixtures::{make_product, product_request},
        test_helpers::Mocks,
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.admin_service(Router::with_path("admin/products").post(handler))
    }

    #[tokio::test]
    async fn test_create_product_success() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_create_product()
            .once()
            .withf(|new| {
                new.details.name == "Starter Kit"
                    && new.details.price == Decimal::from(100)
                    && new.details.currency == Currency::Rub
            })
            .return_once(|new| Ok(make_product(new.uuid)));

        let mut res = TestClient::post("http://example.com/admin/products")
            .json(&product_request())
            .send(&make_service(mocks))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            location,
            Some(format!("/products/{}", body.uuid).as_str())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_unknown_currency_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/admin/products")
            .json(&json!({ "name": "Kit", "price": "10", "currency": "USD" }))
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_rejected_by_database_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_create_product()
            .once()
            .return_once(|_| Err(CatalogServiceError::InvalidData));

        let res = TestClient::post("http://example.com/admin/products")
            .json(&json!({ "name": "Kit", "price": "-10", "currency": "RUB" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
