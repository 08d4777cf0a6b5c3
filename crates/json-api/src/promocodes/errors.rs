//! Promo Code Errors

use salvo::http::StatusError;
use tracing::error;

use ostrum_app::domain::promocodes::PromoCodesServiceError;

pub(crate) fn into_status_error(error: PromoCodesServiceError) -> StatusError {
    match error {
        PromoCodesServiceError::NotFound => StatusError::not_found().brief("Promo code not found"),
        PromoCodesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Promo code already exists")
        }
        PromoCodesServiceError::AlreadyUsed => {
            StatusError::conflict().brief("Promo code already used")
        }
        PromoCodesServiceError::NotEligible => {
            StatusError::forbidden().brief("Promo code is reserved for another user")
        }
        PromoCodesServiceError::LimitExceeded => {
            StatusError::gone().brief("Promo code activation limit reached")
        }
        PromoCodesServiceError::WrongContext => {
            StatusError::bad_request().brief("Promo code can only be used when topping up")
        }
        PromoCodesServiceError::ServerRequired => {
            StatusError::bad_request().brief("A server must be chosen to receive items")
        }
        PromoCodesServiceError::InvalidReference
        | PromoCodesServiceError::MissingRequiredData
        | PromoCodesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid promo code payload")
        }
        PromoCodesServiceError::Purchase(source) => crate::store::errors::into_status_error(source),
        PromoCodesServiceError::Sql(source) => {
            error!("promo code storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
