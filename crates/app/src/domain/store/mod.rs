//! Store
//!
//! Purchases, gifts and free openings.

pub mod data;
pub(crate) mod engine;
pub mod errors;
pub mod service;

pub use errors::StoreServiceError;
pub use service::*;
