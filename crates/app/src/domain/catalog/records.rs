//! Catalog Records

use jiff::{SignedDuration, Timestamp};
use ostrum::{
    currency::Currency,
    loot::LootEntry,
    pricing::{Discount, PriceTag},
    rewards::{ItemInfo, Reward, RewardSource},
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: Decimal,
    pub currency: Currency,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_crate: bool,
    pub is_free: bool,
    pub contents: Vec<Reward>,
    pub loot_table: Vec<LootEntry>,
    pub servers: Vec<String>,
    pub discount: Option<Discount>,
    pub event_bonus: Option<Decimal>,
    pub cooldown_hours: Option<u32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    #[must_use]
    pub fn price_tag(&self) -> PriceTag {
        PriceTag {
            price: self.price,
            currency: self.currency,
            discount: self.discount,
            event_bonus: self.event_bonus,
        }
    }

    #[must_use]
    pub fn reward_source(&self) -> RewardSource<'_> {
        RewardSource::for_product(self.is_crate, &self.contents, &self.loot_table)
    }

    /// Time between claims of a free product, when it has one.
    #[must_use]
    pub fn cooldown(&self) -> Option<SignedDuration> {
        self.cooldown_hours
            .map(|hours| SignedDuration::from_hours(i64::from(hours)))
    }

    /// Whether the product is offered on `server`.
    #[must_use]
    pub fn is_offered_on(&self, server: &str) -> bool {
        self.servers.iter().any(|id| id == server)
    }
}

/// Item Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub code: String,
    pub name: String,
    pub icon_url: String,
    pub category: Option<String>,
    pub updated_at: Timestamp,
}

impl ItemRecord {
    #[must_use]
    pub fn info(&self) -> ItemInfo {
        ItemInfo {
            name: self.name.clone(),
            icon_url: self.icon_url.clone(),
        }
    }
}

/// Server Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerRecord {
    pub identifier: String,
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub updated_at: Timestamp,
}
