//! Redeem Promo Code Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use ostrum_app::domain::promocodes::records::Redemption;

use crate::{
    extensions::*,
    models::{BalancesBody, GrantedItemBody},
    observability::observe_redemption,
    promocodes::{errors::into_status_error, models::RewardBody},
    state::State,
};

/// Redeem Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedeemRequest {
    /// The code as typed; case and surrounding whitespace are ignored
    pub code: String,

    /// Game server that receives any items
    #[serde(default)]
    pub server: Option<String>,
}

/// Redeem Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedemptionResponse {
    /// The normalised code
    pub code: String,

    /// Reward granted
    pub reward: RewardBody,

    /// Human readable summary of the reward
    pub description: String,

    /// Balances after redemption
    pub balances: BalancesBody,

    /// Items queued for delivery
    pub granted: Vec<GrantedItemBody>,
}

impl From<Redemption> for RedemptionResponse {
    fn from(redemption: Redemption) -> Self {
        Self {
            code: redemption.code,
            reward: redemption.reward.into(),
            description: redemption.description,
            balances: redemption.balances.into(),
            granted: redemption.granted.into_iter().map(Into::into).collect(),
        }
    }
}

/// Redeem Promo Code Handler
#[endpoint(
    tags("promocodes"),
    summary = "Redeem Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promo code redeemed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Server required or code not usable here"),
        (status_code = StatusCode::FORBIDDEN, description = "Promo code is reserved for another user"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo code not found"),
        (status_code = StatusCode::CONFLICT, description = "Promo code already used"),
        (status_code = StatusCode::GONE, description = "Promo code activation limit reached"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RedeemRequest>,
    depot: &mut Depot,
) -> Result<Json<RedemptionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let request = json.into_inner();

    let redemption = state
        .app
        .promocodes
        .redeem(user.uuid, request.code, request.server)
        .await
        .map_err(into_status_error)?;

    observe_redemption(redemption.reward.kind());

    Ok(Json(redemption.into()))
}

#[cfg(test)]
mod tests {
    use ostrum::currency::Balances;
    use ostrum_app::domain::promocodes::{PromoCodesServiceError, records::PromoReward};
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID};

    use super::*;

    fn route() -> Router {
        Router::with_path("promocodes/redeem").post(handler)
    }

    #[tokio::test]
    async fn test_redeem_balance_code() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .promocodes
            .expect_redeem()
            .once()
            .withf(|user, code, server| {
                *user == TEST_USER_UUID && code == " welcome " && server.is_none()
            })
            .return_once(|_, _, _| {
                Ok(Redemption {
                    code: "WELCOME".to_string(),
                    reward: PromoReward::RubBalance {
                        amount: Decimal::from(100),
                    },
                    description: "100 ₽ added to your balance".to_string(),
                    balances: Balances::new(Decimal::from(200), Decimal::ZERO),
                    granted: Vec::new(),
                })
            });

        let response: RedemptionResponse = TestClient::post("http://example.com/promocodes/redeem")
            .json(&json!({ "code": " welcome " }))
            .send(&mocks.service(route()))
            .await
            .take_json()
            .await?;

        assert_eq!(response.code, "WELCOME");
        assert_eq!(response.balances.balance, "200");
        assert_eq!(
            response.reward,
            RewardBody::RubBalance {
                amount: "100".to_string()
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_forwards_server() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .promocodes
            .expect_redeem()
            .once()
            .withf(|_, _, server| server.as_deref() == Some("srv_1"))
            .return_once(|_, _, _| Err(PromoCodesServiceError::AlreadyUsed));

        let res = TestClient::post("http://example.com/promocodes/redeem")
            .json(&json!({ "code": "KIT", "server": "srv_1" }))
            .send(&mocks.service(route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_rejections_map_to_statuses() -> TestResult {
        let cases = [
            (PromoCodesServiceError::NotFound, StatusCode::NOT_FOUND),
            (PromoCodesServiceError::NotEligible, StatusCode::FORBIDDEN),
            (PromoCodesServiceError::LimitExceeded, StatusCode::GONE),
            (PromoCodesServiceError::WrongContext, StatusCode::BAD_REQUEST),
            (PromoCodesServiceError::ServerRequired, StatusCode::BAD_REQUEST),
        ];

        for (error, expected) in cases {
            let mut mocks = Mocks::default();

            mocks
                .promocodes
                .expect_redeem()
                .once()
                .return_once(move |_, _, _| Err(error));

            let res = TestClient::post("http://example.com/promocodes/redeem")
                .json(&json!({ "code": "CODE" }))
                .send(&mocks.service(route()))
                .await;

            assert_eq!(res.status_code, Some(expected));
        }

        Ok(())
    }
}
