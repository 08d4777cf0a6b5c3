//! Promo Codes

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub(crate) mod rules;
pub mod service;

pub use errors::PromoCodesServiceError;
pub use service::*;
