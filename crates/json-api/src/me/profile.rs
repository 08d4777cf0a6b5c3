//! Profile Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, models::UserResponse, state::State, users::errors::into_status_error};

/// Profile Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileResponse {
    /// The account itself
    #[serde(flatten)]
    pub user: UserResponse,

    /// Crate products the user can open for free
    pub free_crates: Vec<Uuid>,
}

/// Profile Handler
///
/// Returns the authenticated user with fresh balances.
#[endpoint(
    tags("me"),
    summary = "Get Profile",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let free_crates = state
        .app
        .accounts
        .list_free_crates(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProfileResponse {
        user: user.clone().into(),
        free_crates: free_crates.into_iter().map(|p| p.into_uuid()).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use ostrum_app::domain::catalog::records::ProductUuid;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID};

    use super::*;

    fn route() -> Router {
        Router::with_path("me").get(handler)
    }

    #[tokio::test]
    async fn test_profile_includes_balances_and_free_crates() -> TestResult {
        let crate_product = ProductUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_list_free_crates()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |_| Ok(vec![crate_product]));

        let response: ProfileResponse = TestClient::get("http://example.com/me")
            .send(&mocks.service(route()))
            .await
            .take_json()
            .await?;

        assert_eq!(response.user.nickname, "player");
        assert_eq!(response.user.balances.balance, "100");
        assert_eq!(response.free_crates, vec![crate_product.into_uuid()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_requires_user() -> TestResult {
        let res = TestClient::get("http://example.com/me")
            .send(&Mocks::default().service_without_user(route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
