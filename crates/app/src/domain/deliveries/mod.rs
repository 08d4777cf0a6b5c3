//! Deliveries
//!
//! The pending item queue the in-game bridge drains.

pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::DeliveriesServiceError;
pub use service::*;
