//! Set Referrer Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, models::UserResponse, state::State, users::errors::into_status_error};

/// Set Referrer Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetReferrerRequest {
    /// The referrer's referral code
    pub code: String,
}

/// Set Referrer Handler
///
/// Names the user who referred the authenticated user. It can be set once.
#[endpoint(
    tags("me"),
    summary = "Set Referrer",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Referrer recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Self-referral or referrer already set"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown referral code"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SetReferrerRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let user = state
        .app
        .accounts
        .set_referrer(user.uuid, json.into_inner().code)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use ostrum_app::domain::accounts::{
        AccountsServiceError,
        records::{Role, UserUuid},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_user};

    use super::*;

    fn route() -> Router {
        Router::with_path("me/referrer").post(handler)
    }

    #[tokio::test]
    async fn test_set_referrer_success() -> TestResult {
        let referrer = UserUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_set_referrer()
            .once()
            .withf(|user, code| *user == TEST_USER_UUID && code == "FRIEND01")
            .return_once(move |_, _| {
                let mut user = make_user("player", Role::User);
                user.referred_by = Some(referrer);

                Ok(user)
            });

        let response: UserResponse = TestClient::post("http://example.com/me/referrer")
            .json(&json!({ "code": "FRIEND01" }))
            .send(&mocks.service(route()))
            .await
            .take_json()
            .await?;

        assert_eq!(response.referred_by, Some(referrer.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_rejections_map_to_statuses() -> TestResult {
        let cases = [
            (AccountsServiceError::InvalidReferral, StatusCode::BAD_REQUEST),
            (AccountsServiceError::AlreadyReferred, StatusCode::BAD_REQUEST),
            (AccountsServiceError::NotFound, StatusCode::NOT_FOUND),
        ];

        for (error, expected) in cases {
            let mut mocks = Mocks::default();

            mocks
                .accounts
                .expect_set_referrer()
                .once()
                .return_once(move |_, _| Err(error));

            let res = TestClient::post("http://example.com/me/referrer")
                .json(&json!({ "code": "OSTRUM42" }))
                .send(&mocks.service(route()))
                .await;

            assert_eq!(res.status_code, Some(expected));
        }

        Ok(())
    }
}
