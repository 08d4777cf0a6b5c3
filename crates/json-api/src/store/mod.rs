//! Store

pub(crate) mod errors;
pub(crate) mod purchase;
