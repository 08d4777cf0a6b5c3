//! Product request and response bodies

use jiff::Timestamp;
use ostrum::{currency::Currency, loot::LootEntry, pricing::Discount, rewards::Reward};
use ostrum_app::domain::catalog::{data::ProductDetails, records::ProductRecord};
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extensions::*;

/// Item code and quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct RewardBody {
    /// Game item code
    pub item_code: String,

    /// Quantity granted
    pub quantity: u32,
}

/// One weighted loot table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct LootEntryBody {
    /// Game item code
    pub item_code: String,

    /// Quantity granted
    pub quantity: u32,

    /// Raw weight; weights are not normalised
    pub chance: f64,
}

/// Percentage discount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountBody {
    /// Whole percent taken off, 0 to 100
    pub percent: u8,

    /// RFC 3339 moment the discount stops applying
    pub ends_at: Option<String>,
}

/// Product as shown in the storefront
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Base unit price
    pub price: String,

    /// Unit price right now, after any active discount
    pub sale_price: String,

    /// `RUB` or `EVENT`
    pub currency: String,

    /// Storefront image
    pub image_url: Option<String>,

    /// Storefront category
    pub category: Option<String>,

    /// Whether the product rolls its loot table instead of granting contents
    pub is_crate: bool,

    /// Whether the product is claimed rather than bought
    pub is_free: bool,

    /// Fixed contents granted per unit
    pub contents: Vec<RewardBody>,

    /// Weighted rolls for crates
    pub loot_table: Vec<LootEntryBody>,

    /// Servers the product is offered on; empty means all
    pub servers: Vec<String>,

    /// Discount, when one is configured
    pub discount: Option<DiscountBody>,

    /// Fixed snowflake bonus per unit
    pub event_bonus: Option<String>,

    /// Hours between claims of a free product
    pub cooldown_hours: Option<u32>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl ProductResponse {
    pub(crate) fn at(product: ProductRecord, now: Timestamp) -> Self {
        let sale_price = product.price_tag().unit_price_at(now);

        Self {
            uuid: product.uuid.into_uuid(),
            name: product.name,
            price: product.price.to_string(),
            sale_price: sale_price.to_string(),
            currency: product.currency.code().to_string(),
            image_url: product.image_url,
            category: product.category,
            is_crate: product.is_crate,
            is_free: product.is_free,
            contents: product
                .contents
                .into_iter()
                .map(|reward| RewardBody {
                    item_code: reward.item_code,
                    quantity: reward.quantity,
                })
                .collect(),
            loot_table: product
                .loot_table
                .into_iter()
                .map(|entry| LootEntryBody {
                    item_code: entry.item_code,
                    quantity: entry.quantity,
                    chance: entry.chance,
                })
                .collect(),
            servers: product.servers,
            discount: product.discount.map(|discount| DiscountBody {
                percent: discount.percent,
                ends_at: discount.ends_at.map(|ends_at| ends_at.to_string()),
            }),
            event_bonus: product.event_bonus.map(|bonus| bonus.to_string()),
            cooldown_hours: product.cooldown_hours,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Editable product fields, used for both create and update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductRequest {
    /// Display name
    pub name: String,

    /// Base unit price as a decimal string
    pub price: String,

    /// `RUB` or `EVENT`
    pub currency: String,

    /// Storefront image
    #[serde(default)]
    pub image_url: Option<String>,

    /// Storefront category
    #[serde(default)]
    pub category: Option<String>,

    /// Roll the loot table instead of granting contents
    #[serde(default)]
    pub is_crate: bool,

    /// Claimed rather than bought
    #[serde(default)]
    pub is_free: bool,

    /// Fixed contents granted per unit
    #[serde(default)]
    pub contents: Vec<RewardBody>,

    /// Weighted rolls for crates
    #[serde(default)]
    pub loot_table: Vec<LootEntryBody>,

    /// Servers the product is offered on; empty means all
    #[serde(default)]
    pub servers: Vec<String>,

    /// Optional discount
    #[serde(default)]
    pub discount: Option<DiscountBody>,

    /// Fixed snowflake bonus per unit, as a decimal string
    #[serde(default)]
    pub event_bonus: Option<String>,

    /// Hours between claims of a free product
    #[serde(default)]
    pub cooldown_hours: Option<u32>,
}

impl TryFrom<ProductRequest> for ProductDetails {
    type Error = StatusError;

    fn try_from(request: ProductRequest) -> Result<Self, Self::Error> {
        let discount = request
            .discount
            .map(|discount| {
                let ends_at = discount
                    .ends_at
                    .map(|value| value.parse::<Timestamp>())
                    .transpose()
                    .or_400("could not parse discount end")?;

                Discount::new(discount.percent, ends_at).or_400("invalid discount")
            })
            .transpose()?;

        Ok(ProductDetails {
            name: request.name,
            price: request.price.parse::<Decimal>().or_400("could not parse price")?,
            currency: request
                .currency
                .parse::<Currency>()
                .or_400("unknown currency")?,
            image_url: request.image_url,
            category: request.category,
            is_crate: request.is_crate,
            is_free: request.is_free,
            contents: request
                .contents
                .into_iter()
                .map(|reward| Reward::new(reward.item_code, reward.quantity))
                .collect(),
            loot_table: request
                .loot_table
                .into_iter()
                .map(|entry| LootEntry::new(entry.item_code, entry.quantity, entry.chance))
                .collect(),
            servers: request.servers,
            discount,
            event_bonus: request
                .event_bonus
                .map(|bonus| bonus.parse::<Decimal>())
                .transpose()
                .or_400("could not parse event bonus")?,
            cooldown_hours: request.cooldown_hours,
        })
    }
}


#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::{fixtures::*, *};

    #[test]
    fn response_shows_discounted_sale_price() {
        let response = ProductResponse::at(
            make_product(ostrum_app::domain::catalog::records::ProductUuid::new()),
            Timestamp::UNIX_EPOCH,
        );

        assert_eq!(response.price, "100");
        assert_eq!(response.sale_price, "70");
        assert_eq!(response.currency, "RUB");
    }

    #[test]
    fn request_converts_to_details() -> TestResult {
        let details = ProductDetails::try_from(product_request())?;

        assert_eq!(details.price, Decimal::from(100));
        assert_eq!(details.currency, Currency::Rub);
        assert_eq!(details.contents, vec![Reward::new("wood", 1000)]);

        Ok(())
    }

    #[test]
    fn malformed_price_is_rejected() {
        let request = ProductRequest {
            price: "a lot".to_string(),
            ..product_request()
        };

        assert!(ProductDetails::try_from(request).is_err());
    }

    #[test]
    fn out_of_range_discount_is_rejected() {
        let request = ProductRequest {
            discount: Some(DiscountBody {
                percent: 150,
                ends_at: None,
            }),
            ..product_request()
        };

        assert!(ProductDetails::try_from(request).is_err());
    }
}
