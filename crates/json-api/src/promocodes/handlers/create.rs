//! Create Promo Code Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    promocodes::{
        errors::into_status_error,
        models::{CreatePromoCodeRequest, PromoCodeResponse},
    },
    state::State,
};

/// Create Promo Code Handler
#[endpoint(
    tags("promocodes"),
    summary = "Create Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Promo code created"),
        (status_code = StatusCode::CONFLICT, description = "Promo code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePromoCodeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PromoCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promocode = state
        .app
        .promocodes
        .create_promocode(json.into_inner().into_new()?)
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/admin/promocodes/{}", promocode.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(promocode.into()))
}
