//! User Errors

use salvo::http::StatusError;
use tracing::error;

use ostrum_app::domain::{accounts::AccountsServiceError, topups::TopUpsServiceError};

pub(crate) fn into_status_error(error: AccountsServiceError) -> StatusError {
    match error {
        AccountsServiceError::NotFound => StatusError::not_found().brief("User not found"),
        AccountsServiceError::AlreadyExists => StatusError::conflict().brief("User already exists"),
        AccountsServiceError::InsufficientFunds => {
            StatusError::payment_required().brief("Balance would become negative")
        }
        AccountsServiceError::InvalidReferral => {
            StatusError::bad_request().brief("Users cannot refer themselves")
        }
        AccountsServiceError::AlreadyReferred => {
            StatusError::bad_request().brief("Referrer is already set")
        }
        AccountsServiceError::Unauthorized => StatusError::unauthorized(),
        AccountsServiceError::InvalidReference
        | AccountsServiceError::MissingRequiredData
        | AccountsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid user payload")
        }
        AccountsServiceError::Sql(source) => {
            error!("accounts storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn top_up_status_error(error: TopUpsServiceError) -> StatusError {
    match error {
        TopUpsServiceError::NotFound => StatusError::not_found().brief("User not found"),
        TopUpsServiceError::InvalidAmount => {
            StatusError::bad_request().brief("Top-up amount must be positive")
        }
        TopUpsServiceError::Promo(source) => crate::promocodes::errors::into_status_error(source),
        TopUpsServiceError::AlreadyExists => StatusError::conflict().brief("Top-up already recorded"),
        TopUpsServiceError::InvalidReference
        | TopUpsServiceError::MissingRequiredData
        | TopUpsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid top-up payload")
        }
        TopUpsServiceError::Sql(source) => {
            error!("top-up storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
