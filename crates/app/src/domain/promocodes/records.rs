//! Promo Code Records

use jiff::Timestamp;
use ostrum::{currency::Balances, rewards::GrantedItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{accounts::records::UserUuid, catalog::records::ProductUuid},
    uuids::TypedUuid,
};

pub type PromoCodeUuid = TypedUuid<PromoCodeRecord>;

/// What a promo code grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoReward {
    RubBalance { amount: Decimal },
    EventBalance { amount: Decimal },
    Product { product: ProductUuid },
    FreeCrate { product: ProductUuid },
    /// Extra percent on a balance top-up; only usable while topping up.
    TopupBonus { percent: u16 },
}

impl PromoReward {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RubBalance { .. } => "RUB_BALANCE",
            Self::EventBalance { .. } => "EVENT_BALANCE",
            Self::Product { .. } => "PRODUCT",
            Self::FreeCrate { .. } => "FREE_CRATE",
            Self::TopupBonus { .. } => "TOPUP_BONUS",
        }
    }

    #[must_use]
    pub const fn is_topup_bonus(&self) -> bool {
        matches!(self, Self::TopupBonus { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromoCodeRecord {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub reward: PromoReward,
    pub max_activations: u32,
    pub current_activations: u32,
    pub user_uuid: Option<UserUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PromoCodeRecord {
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current_activations >= self.max_activations
    }

    /// Whether the code is bound to a user other than `user`.
    #[must_use]
    pub fn is_reserved_for_other(&self, user: UserUuid) -> bool {
        self.user_uuid.is_some_and(|owner| owner != user)
    }
}

/// Result of a successful redemption
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redemption {
    pub code: String,
    pub reward: PromoReward,
    pub description: String,
    pub balances: Balances,
    pub granted: Vec<GrantedItem>,
}
