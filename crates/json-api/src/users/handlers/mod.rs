//! User Handlers

pub(crate) mod balance;
pub(crate) mod free_crates;
pub(crate) mod index;
pub(crate) mod top_up;
