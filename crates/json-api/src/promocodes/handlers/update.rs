//! Update Promo Code Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    promocodes::{
        errors::into_status_error,
        models::{PromoCodeResponse, UpdatePromoCodeRequest},
    },
    state::State,
};

/// Update Promo Code Handler
///
/// Replaces the reward, activation ceiling and user binding. Activations already counted stay.
#[endpoint(
    tags("promocodes"),
    summary = "Update Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promo code updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Promo code not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    promocode: PathParam<Uuid>,
    json: JsonBody<UpdatePromoCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<PromoCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promocode = state
        .app
        .promocodes
        .update_promocode(promocode.into_inner().into(), json.into_inner().try_into()?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(promocode.into()))
}

#[cfg(test)]
mod tests {
    use ostrum_app::domain::promocodes::{
        PromoCodesServiceError,
        records::{PromoCodeUuid, PromoReward},
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{promocodes::models::fixtures::make_promocode, test_helpers::Mocks};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.admin_service(Router::with_path("admin/promocodes/{promocode}").put(handler))
    }

    #[tokio::test]
    async fn test_update_promocode_success() -> TestResult {
        let uuid = PromoCodeUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .promocodes
            .expect_update_promocode()
            .once()
            .withf(move |promocode, update| {
                *promocode == uuid
                    && update.max_activations == 200
                    && update.reward == PromoReward::TopupBonus { percent: 20 }
            })
            .return_once(move |_, update| {
                let mut record = make_promocode(uuid, "WIPE15", update.reward);
                record.max_activations = update.max_activations;

                Ok(record)
            });

        let response: PromoCodeResponse =
            TestClient::put(format!("http://example.com/admin/promocodes/{uuid}"))
                .json(&json!({
                    "reward": { "type": "TOPUP_BONUS", "percent": 20 },
                    "max_activations": 200,
                }))
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        assert_eq!(response.max_activations, 200);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_promocode_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .promocodes
            .expect_update_promocode()
            .once()
            .return_once(|_, _| Err(PromoCodesServiceError::NotFound));

        let res = TestClient::put(format!(
            "http://example.com/admin/promocodes/{}",
            PromoCodeUuid::new()
        ))
        .json(&json!({
            "reward": { "type": "TOPUP_BONUS", "percent": 20 },
            "max_activations": 1,
        }))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
