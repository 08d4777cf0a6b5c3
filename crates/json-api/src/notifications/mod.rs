//! Operator Notifications

pub(crate) mod send;
