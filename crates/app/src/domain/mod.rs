//! Ostrum Domain Concerns

pub mod accounts;
pub mod catalog;
pub mod deliveries;
pub mod ledger;
pub mod notifications;
pub mod promocodes;
pub mod store;
pub mod topups;
