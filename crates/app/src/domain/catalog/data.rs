//! Catalog Data

use ostrum::{
    currency::Currency,
    fixtures::{
        items::ItemDefinition, products::ProductDefinition, servers::ServerDefinition,
    },
    loot::LootEntry,
    pricing::Discount,
    rewards::Reward,
};
use rust_decimal::Decimal;

use crate::domain::catalog::records::ProductUuid;

/// Editable product fields, used both to create and to replace a product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
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
}

impl ProductDetails {
    /// Checks the invariants the schema cannot express.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let crate_has_no_contents = !self.is_crate || self.contents.is_empty();
        let weights_are_sane = self
            .loot_table
            .iter()
            .all(|entry| entry.chance.is_finite() && entry.chance >= 0.0);
        let discount_in_range = self.discount.is_none_or(|discount| discount.percent <= 100);

        crate_has_no_contents
            && weights_are_sane
            && discount_in_range
            && !self.price.is_sign_negative()
            && !self.name.trim().is_empty()
    }
}

impl From<ProductDefinition> for ProductDetails {
    fn from(definition: ProductDefinition) -> Self {
        Self {
            name: definition.name,
            price: definition.price_tag.price,
            currency: definition.price_tag.currency,
            image_url: definition.image_url,
            category: definition.category,
            is_crate: definition.is_crate,
            is_free: definition.is_free,
            contents: definition.contents,
            loot_table: definition.loot_table,
            servers: definition.servers,
            discount: definition.price_tag.discount,
            event_bonus: definition.price_tag.event_bonus,
            cooldown_hours: definition.cooldown_hours,
        }
    }
}

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub details: ProductDetails,
}

/// Item catalog entry to insert or replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub code: String,
    pub name: String,
    pub icon_url: String,
    pub category: Option<String>,
}

impl From<ItemDefinition> for NewItem {
    fn from(definition: ItemDefinition) -> Self {
        Self {
            code: definition.code,
            name: definition.name,
            icon_url: definition.icon_url,
            category: definition.category,
        }
    }
}

/// Server registry entry to insert or replace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServer {
    pub identifier: String,
    pub name: String,
    pub ip: String,
    pub port: u16,
}

impl From<ServerDefinition> for NewServer {
    fn from(definition: ServerDefinition) -> Self {
        Self {
            identifier: definition.identifier,
            name: definition.name,
            ip: definition.ip,
            port: definition.port,
        }
    }
}

/// A catalog set to seed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSeed {
    pub items: Vec<NewItem>,
    pub servers: Vec<NewServer>,
    pub products: Vec<ProductDetails>,
}

impl From<&ostrum::fixtures::Fixture> for CatalogSeed {
    fn from(fixture: &ostrum::fixtures::Fixture) -> Self {
        Self {
            items: fixture.items().iter().cloned().map(NewItem::from).collect(),
            servers: fixture
                .servers()
                .iter()
                .cloned()
                .map(NewServer::from)
                .collect(),
            products: fixture
                .products()
                .iter()
                .cloned()
                .map(ProductDetails::from)
                .collect(),
        }
    }
}

/// What a seed run wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub items: usize,
    pub servers: usize,
    pub products: usize,
}
