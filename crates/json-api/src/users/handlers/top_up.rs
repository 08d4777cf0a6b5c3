//! Top-up Handler

use std::sync::Arc;

use ostrum_app::domain::topups::data::{TopUpOutcome, TopUpRequest};
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

use crate::{
    extensions::*,
    models::{BalancesBody, TransactionResponse},
    observability::observe_top_up,
    state::State,
    users::errors::top_up_status_error,
};

/// Top-up Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TopUpBody {
    /// Roubles paid, as a decimal string
    pub amount: String,

    /// Optional `TOPUP_BONUS` promo code
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Top-up Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TopUpResponse {
    /// Deposit plus bonus
    pub credited: String,

    /// Bonus from the promo code
    pub bonus: String,

    /// Balances after the deposit
    pub balances: BalancesBody,

    /// The `DEPOSIT` ledger entry
    pub transaction: TransactionResponse,

    /// Commission paid to the depositor's referrer
    pub referral_commission: Option<String>,
}

impl From<TopUpOutcome> for TopUpResponse {
    fn from(outcome: TopUpOutcome) -> Self {
        Self {
            credited: outcome.credited.to_string(),
            bonus: outcome.bonus.to_string(),
            balances: outcome.balances.into(),
            transaction: outcome.transaction.into(),
            referral_commission: outcome.referral_commission.map(|c| c.to_string()),
        }
    }
}

/// Top-up Handler
///
/// Records a confirmed payment for a user. Payment capture itself happens elsewhere.
#[endpoint(
    tags("users"),
    summary = "Record Top-up",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Deposit recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "User or promo code not found"),
        (status_code = StatusCode::CONFLICT, description = "Promo code already used"),
        (status_code = StatusCode::GONE, description = "Promo code activation limit reached"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<TopUpBody>,
    depot: &mut Depot,
) -> Result<Json<TopUpResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let body = json.into_inner();

    let mut request = TopUpRequest::new(
        user.into_inner().into(),
        body.amount.parse::<Decimal>().or_400("could not parse amount")?,
    );

    if let Some(code) = body.promo_code {
        request = request.promo_code(code);
    }

    let outcome = state
        .app
        .topups
        .top_up(request)
        .await
        .map_err(top_up_status_error)?;

    observe_top_up(!outcome.bonus.is_zero());

    Ok(Json(outcome.into()))
}
