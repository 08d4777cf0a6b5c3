//! Store service errors.

use jiff::Timestamp;
use ostrum::{currency::Currency, pricing::PricingError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreServiceError {
    #[error("user or product not found")]
    NotFound,

    #[error("quantity is outside the allowed range")]
    InvalidQuantity,

    #[error("insufficient {currency} balance")]
    InsufficientFunds { currency: Currency },

    #[error("product can be claimed again at {available_at}")]
    OnCooldown { available_at: Timestamp },

    #[error("no free opening available for this product")]
    NoFreeOpening,

    #[error("purchase already recorded")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<PricingError> for StoreServiceError {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::InvalidQuantity => Self::InvalidQuantity,
            PricingError::InvalidPercent(_) | PricingError::Overflow => Self::InvalidData,
        }
    }
}

impl From<Error> for StoreServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
