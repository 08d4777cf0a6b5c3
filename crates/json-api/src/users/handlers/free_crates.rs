//! Grant Free Crate Handler

use std::sync::Arc;

use ostrum_app::domain::accounts::AccountsServiceError;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Grant Free Crate Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GrantFreeCrateRequest {
    /// Product the user may open once without paying
    pub product: Uuid,
}

/// Free openings a user holds
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FreeCratesResponse {
    /// Products with an unused free opening
    pub free_crates: Vec<Uuid>,
}

/// Grant Free Crate Handler
///
/// Gives the user one free opening of a product. Granting a product the user already holds is a
/// no-op.
#[endpoint(
    tags("users"),
    summary = "Grant Free Crate",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Free opening granted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "User or product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<GrantFreeCrateRequest>,
    depot: &mut Depot,
) -> Result<Json<FreeCratesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = user.into_inner().into();

    state
        .app
        .accounts
        .grant_free_crate(user, json.into_inner().product.into())
        .await
        .map_err(|error| match error {
            AccountsServiceError::InvalidReference => {
                StatusError::not_found().brief("User or product not found")
            }
            other => into_status_error(other),
        })?;

    let free_crates = state
        .app
        .accounts
        .list_free_crates(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(FreeCratesResponse {
        free_crates: free_crates.into_iter().map(|product| product.into_uuid()).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use ostrum_app::domain::{accounts::records::UserUuid, catalog::records::ProductUuid};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.admin_service(Router::with_path("admin/users/{user}/free-crates").post(handler))
    }

    #[tokio::test]
    async fn test_grant_lists_free_crates() -> TestResult {
        let target = UserUuid::new();
        let product = ProductUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_grant_free_crate()
            .once()
            .withf(move |user, granted| *user == target && *granted == product)
            .return_once(|_, _| Ok(()));

        mocks
            .accounts
            .expect_list_free_crates()
            .once()
            .withf(move |user| *user == target)
            .return_once(move |_| Ok(vec![product]));

        let response: FreeCratesResponse =
            TestClient::post(format!("http://example.com/admin/users/{target}/free-crates"))
                .json(&json!({ "product": product.into_uuid() }))
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        assert_eq!(response.free_crates, vec![product.into_uuid()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_user_or_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_grant_free_crate()
            .once()
            .return_once(|_, _| Err(AccountsServiceError::InvalidReference));

        mocks.accounts.expect_list_free_crates().never();

        let res = TestClient::post(format!(
            "http://example.com/admin/users/{}/free-crates",
            UserUuid::new()
        ))
        .json(&json!({ "product": ProductUuid::new().into_uuid() }))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_product_returns_400() -> TestResult {
        let res = TestClient::post(format!(
            "http://example.com/admin/users/{}/free-crates",
            UserUuid::new()
        ))
        .json(&json!({}))
        .send(&make_service(Mocks::default()))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
