//! Test Infrastructure

pub(crate) mod helpers;

pub(crate) use context::TestContext;
