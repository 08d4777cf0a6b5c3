//! Store Errors

use salvo::http::StatusError;
use tracing::error;

use ostrum_app::domain::store::StoreServiceError;

pub(crate) fn into_status_error(error: StoreServiceError) -> StatusError {
    match error {
        StoreServiceError::NotFound => StatusError::not_found().brief("User or product not found"),
        StoreServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity is outside the allowed range")
        }
        StoreServiceError::NoFreeOpening => {
            StatusError::bad_request().brief("No free opening available for this product")
        }
        StoreServiceError::InvalidReference
        | StoreServiceError::MissingRequiredData
        | StoreServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid purchase payload")
        }
        StoreServiceError::InsufficientFunds { currency } => StatusError::payment_required()
            .brief(format!("Insufficient {} balance", currency.code())),
        StoreServiceError::OnCooldown { available_at } => StatusError::conflict()
            .brief("Product is on cooldown")
            .detail(format!("available again at {available_at}")),
        StoreServiceError::AlreadyExists => StatusError::conflict().brief("Purchase already recorded"),
        StoreServiceError::Sql(source) => {
            error!("store storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
