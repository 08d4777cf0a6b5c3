//! Ostrum prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    currency::{Balances, Currency, CurrencyError},
    fixtures::{
        Fixture, FixtureError, items::ItemDefinition, products::ProductDefinition,
        servers::ServerDefinition,
    },
    loot::{LootEntry, roll},
    pricing::{Discount, MAX_QUANTITY, PriceTag, PricingError, Quote},
    receipt::{Receipt, ReceiptError},
    rewards::{
        DEFAULT_ICON_BASE_URL, GrantedItem, ItemInfo, Reward, RewardSource, Rewards, label,
        resolve,
    },
};
