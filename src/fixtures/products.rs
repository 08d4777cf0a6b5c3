//! Product Fixtures

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    currency::Currency,
    fixtures::FixtureError,
    loot::LootEntry,
    pricing::{Discount, PriceTag},
    rewards::Reward,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "150 RUB")
    pub price: String,

    /// Picture shown in the storefront
    #[serde(default)]
    pub image_url: Option<String>,

    /// Storefront category
    #[serde(default)]
    pub category: Option<String>,

    /// Whether the product is a crate
    #[serde(default)]
    pub is_crate: bool,

    /// Whether the product costs nothing
    #[serde(default)]
    pub is_free: bool,

    /// Items granted per unit
    #[serde(default)]
    pub contents: Vec<RewardFixture>,

    /// Crate loot table
    #[serde(default)]
    pub loot_table: Vec<LootFixture>,

    /// Servers the product is offered on
    #[serde(default)]
    pub servers: Vec<String>,

    /// Optional discount
    #[serde(default)]
    pub discount: Option<DiscountFixture>,

    /// Snowflakes credited per unit
    #[serde(default)]
    pub event_bonus: Option<Decimal>,

    /// Hours between claims of a free product
    #[serde(default)]
    pub cooldown_hours: Option<u32>,
}

/// Reward Fixture
#[derive(Debug, Deserialize)]
pub struct RewardFixture {
    /// Item code
    pub item: String,

    /// Quantity
    pub quantity: u32,
}

/// Loot Table Row Fixture
#[derive(Debug, Deserialize)]
pub struct LootFixture {
    /// Item code
    pub item: String,

    /// Quantity
    pub quantity: u32,

    /// Raw weight
    pub chance: f64,
}

/// Discount Fixture
#[derive(Debug, Deserialize)]
pub struct DiscountFixture {
    /// Percentage (e.g., "30%")
    pub percent: String,

    /// RFC 3339 expiry
    #[serde(default)]
    pub ends_at: Option<String>,
}

/// A product loaded from a fixture
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDefinition {
    /// Fixture key
    pub key: String,

    /// Product name
    pub name: String,

    /// Price, currency, discount and bonus
    pub price_tag: PriceTag,

    /// Picture shown in the storefront
    pub image_url: Option<String>,

    /// Storefront category
    pub category: Option<String>,

    /// Whether the product is a crate
    pub is_crate: bool,

    /// Whether the product costs nothing
    pub is_free: bool,

    /// Items granted per unit
    pub contents: Vec<Reward>,

    /// Crate loot table
    pub loot_table: Vec<LootEntry>,

    /// Servers the product is offered on
    pub servers: Vec<String>,

    /// Hours between claims of a free product
    pub cooldown_hours: Option<u32>,
}

impl ProductDefinition {
    /// Every item code the product can grant
    pub fn item_codes(&self) -> impl Iterator<Item = &str> {
        self.contents
            .iter()
            .map(|reward| reward.item_code.as_str())
            .chain(self.loot_table.iter().map(|entry| entry.item_code.as_str()))
    }
}

impl ProductFixture {
    /// Validate and convert the fixture, keyed by `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the price, discount percentage or expiry is malformed, or a crate
    /// carries contents instead of a loot table.
    pub fn into_definition(self, key: String) -> Result<ProductDefinition, FixtureError> {
        let (price, currency) = parse_price(&self.price)?;

        let discount = self
            .discount
            .map(|discount| {
                let percent = parse_percentage(&discount.percent)?;
                let ends_at = discount
                    .ends_at
                    .as_deref()
                    .map(|s| {
                        s.parse::<Timestamp>()
                            .map_err(|_err| FixtureError::InvalidTimestamp(s.to_string()))
                    })
                    .transpose()?;

                Discount::new(percent, ends_at)
                    .map_err(|_err| FixtureError::InvalidPercentage(discount.percent.clone()))
            })
            .transpose()?;

        if self.is_crate && !self.contents.is_empty() {
            return Err(FixtureError::InvalidProduct(
                key,
                "crates take a loot_table, not contents".to_string(),
            ));
        }

        Ok(ProductDefinition {
            key,
            name: self.name,
            price_tag: PriceTag {
                price,
                currency,
                discount,
                event_bonus: self.event_bonus,
            },
            image_url: self.image_url,
            category: self.category,
            is_crate: self.is_crate,
            is_free: self.is_free,
            contents: self
                .contents
                .into_iter()
                .map(|reward| Reward::new(reward.item, reward.quantity))
                .collect(),
            loot_table: self
                .loot_table
                .into_iter()
                .map(|entry| LootEntry::new(entry.item, entry.quantity, entry.chance))
                .collect(),
            servers: self.servers,
            cooldown_hours: self.cooldown_hours,
        })
    }
}

/// Parse price string (e.g., "150 RUB") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", the amount is not a
/// non-negative decimal, or the currency code is not recognised.
pub fn parse_price(s: &str) -> Result<(Decimal, Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let currency = currency_code
        .parse::<Currency>()
        .map_err(|_err| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((amount, currency))
}

/// Parse a whole percentage (e.g., "30%" or "30")
///
/// # Errors
///
/// Returns an error if the value is not a whole number between 0 and 100.
pub fn parse_percentage(s: &str) -> Result<u8, FixtureError> {
    let trimmed = s.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    digits
        .parse::<u8>()
        .ok()
        .filter(|percent| *percent <= 100)
        .ok_or_else(|| FixtureError::InvalidPercentage(s.to_string()))
}
