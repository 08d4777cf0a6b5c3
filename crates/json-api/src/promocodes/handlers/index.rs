//! Promo Code Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    promocodes::{errors::into_status_error, models::PromoCodeResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoCodesResponse {
    /// Every promo code, newest first
    pub promocodes: Vec<PromoCodeResponse>,
}

/// Promo Code Index Handler
#[endpoint(
    tags("promocodes"),
    summary = "List Promo Codes",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PromoCodesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promocodes = state
        .app
        .promocodes
        .list_promocodes()
        .await
        .map_err(into_status_error)?;

    Ok(Json(PromoCodesResponse {
        promocodes: promocodes.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use ostrum_app::domain::promocodes::records::{PromoCodeUuid, PromoReward};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{promocodes::models::fixtures::make_promocode, test_helpers::Mocks};

    use super::*;

    #[tokio::test]
    async fn test_index_lists_promocodes() -> TestResult {
        let uuid = PromoCodeUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .promocodes
            .expect_list_promocodes()
            .once()
            .return_once(move || {
                Ok(vec![make_promocode(
                    uuid,
                    "WIPE15",
                    PromoReward::TopupBonus { percent: 15 },
                )])
            });

        let response: PromoCodesResponse = TestClient::get("http://example.com/admin/promocodes")
            .send(&mocks.admin_service(Router::with_path("admin/promocodes").get(handler)))
            .await
            .take_json()
            .await?;

        assert_eq!(response.promocodes.len(), 1);
        assert_eq!(response.promocodes[0].uuid, uuid.into_uuid());
        assert_eq!(response.promocodes[0].code, "WIPE15");

        Ok(())
    }
}
