//! Adjust Balance Handler

use std::sync::Arc;

use ostrum::currency::Currency;
use ostrum_app::domain::accounts::data::BalanceAdjustment;
use rust_decimal::Decimal;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, models::UserResponse, state::State, users::errors::into_status_error};

/// Balance Adjustment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdjustBalanceRequest {
    /// Signed decimal amount; negative values debit
    pub amount: String,

    /// `RUB` or `EVENT`
    pub currency: String,
}

impl TryFrom<AdjustBalanceRequest> for BalanceAdjustment {
    type Error = StatusError;

    fn try_from(request: AdjustBalanceRequest) -> Result<Self, Self::Error> {
        Ok(BalanceAdjustment {
            amount: request.amount.parse::<Decimal>().or_400("could not parse amount")?,
            currency: request
                .currency
                .parse::<Currency>()
                .or_400("unknown currency")?,
        })
    }
}

/// Adjust Balance Handler
///
/// Applies an operator correction to one balance. The result is never negative.
#[endpoint(
    tags("users"),
    summary = "Adjust Balance",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Balance adjusted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Balance would become negative"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<AdjustBalanceRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .accounts
        .adjust_balance(user.into_inner().into(), json.into_inner().try_into()?)
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

    use crate::test_helpers::{Mocks, make_user};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.admin_service(Router::with_path("admin/users/{user}/balance").post(handler))
    }

    #[tokio::test]
    async fn test_adjust_balance_success() -> TestResult {
        let target = UserUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_adjust_balance()
            .once()
            .withf(move |user, adjustment| {
                *user == target
                    && *adjustment
                        == BalanceAdjustment {
                            amount: Decimal::new(-255, 1),
                            currency: Currency::Event,
                        }
            })
            .return_once(|_, _| {
                let mut user = make_user("player", Role::User);
                user.event_balance = Decimal::new(745, 1);

                Ok(user)
            });

        let response: UserResponse =
            TestClient::post(format!("http://example.com/admin/users/{target}/balance"))
                .json(&json!({ "amount": "-25.5", "currency": "event" }))
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        assert_eq!(response.balances.event_balance, "74.5");

        Ok(())
    }

    #[tokio::test]
    async fn test_overdraft_returns_402() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_adjust_balance()
            .once()
            .return_once(|_, _| Err(AccountsServiceError::InsufficientFunds));

        let res = TestClient::post(format!(
            "http://example.com/admin/users/{}/balance",
            UserUuid::new()
        ))
        .json(&json!({ "amount": "-1000", "currency": "RUB" }))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::PAYMENT_REQUIRED));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_amount_returns_400() -> TestResult {
        let res = TestClient::post(format!(
            "http://example.com/admin/users/{}/balance",
            UserUuid::new()
        ))
        .json(&json!({ "amount": "ten", "currency": "RUB" }))
        .send(&make_service(Mocks::default()))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
