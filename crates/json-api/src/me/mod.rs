//! The authenticated user's own resources

pub(crate) mod notifications;
pub(crate) mod pending_items;
pub(crate) mod profile;
pub(crate) mod referrer;
pub(crate) mod transactions;
