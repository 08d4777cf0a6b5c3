//! Accounts

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod referrals;
pub(crate) mod repository;
pub mod service;
pub(crate) mod tokens;

pub use errors::AccountsServiceError;
pub use service::*;
