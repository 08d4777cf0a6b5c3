//! Top-ups
//!
//! Operator-initiated balance deposits with optional promo bonus and referral commission.

pub mod data;
pub mod errors;
pub mod service;

pub use errors::TopUpsServiceError;
pub use service::*;
