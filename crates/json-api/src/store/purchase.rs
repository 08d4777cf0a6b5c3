//! Purchase Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ostrum_app::domain::store::data::{PurchaseMode, PurchaseOutcome, PurchaseRequest};

use crate::{
    extensions::*,
    models::{BalancesBody, GrantedItemBody, TransactionResponse},
    observability::observe_purchase,
    state::State,
    store::errors::into_status_error,
};

/// How the buyer pays. Gifting is reserved for operators and promo codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PaymentBody {
    /// Debit the product's currency
    #[default]
    Paid,

    /// Spend a free opening entitlement
    FreeOpening,
}

impl From<PaymentBody> for PurchaseMode {
    fn from(payment: PaymentBody) -> Self {
        match payment {
            PaymentBody::Paid => PurchaseMode::Paid,
            PaymentBody::FreeOpening => PurchaseMode::FreeOpening,
        }
    }
}

const fn one() -> u32 {
    1
}

/// Purchase Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PurchaseBody {
    /// Product to buy
    pub product: Uuid,

    /// Game server the items are delivered to
    pub server: String,

    /// Units to buy
    #[serde(default = "one")]
    pub quantity: u32,

    /// Payment method
    #[serde(default)]
    pub payment: PaymentBody,
}

/// Purchase Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PurchaseResponse {
    /// Product bought
    pub product_uuid: Uuid,

    /// Product name at the time of purchase
    pub product_name: String,

    /// Items queued for delivery
    pub items: Vec<GrantedItemBody>,

    /// Currency charged
    pub currency: String,

    /// Amount charged
    pub charged: String,

    /// Snowflakes credited as a purchase bonus
    pub event_bonus: String,

    /// Balances after the purchase
    pub balances: BalancesBody,

    /// The ledger entry recorded
    pub transaction: TransactionResponse,
}

impl From<PurchaseOutcome> for PurchaseResponse {
    fn from(outcome: PurchaseOutcome) -> Self {
        Self {
            product_uuid: outcome.product_uuid.into_uuid(),
            product_name: outcome.product_name,
            items: outcome.items.into_iter().map(Into::into).collect(),
            currency: outcome.currency.code().to_string(),
            charged: outcome.charged.to_string(),
            event_bonus: outcome.event_bonus.to_string(),
            balances: outcome.balances.into(),
            transaction: outcome.transaction.into(),
        }
    }
}

/// Purchase Handler
///
/// Buys a product for the authenticated user and queues its items on the chosen server.
#[endpoint(
    tags("store"),
    summary = "Purchase Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Purchase completed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Insufficient balance"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Product is on cooldown"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PurchaseBody>,
    depot: &mut Depot,
) -> Result<Json<PurchaseResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let body = json.into_inner();

    let mode = PurchaseMode::from(body.payment);

    let outcome = state
        .app
        .store
        .purchase(
            PurchaseRequest::new(user.uuid, body.product.into(), body.server)
                .quantity(body.quantity)
                .mode(mode),
        )
        .await
        .map_err(into_status_error)?;

    observe_purchase(outcome.currency.code(), mode.as_str());

    Ok(Json(outcome.into()))
}
