//! Authentication

mod admin;
pub(crate) mod middleware;

pub(crate) use admin::require_admin;
