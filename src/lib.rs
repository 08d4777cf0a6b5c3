//! Ostrum
//!
//! Ostrum is the storefront engine behind a game-server community shop: prices and discounts,
//! weighted crate rolls, reward resolution and catalog fixtures. It holds no storage of its own.

pub mod currency;
pub mod fixtures;
pub mod loot;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod rewards;
