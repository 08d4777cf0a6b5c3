//! Promo code request and response bodies

use ostrum_app::domain::promocodes::{
    data::{NewPromoCode, PromoCodeUpdate},
    records::{PromoCodeRecord, PromoCodeUuid, PromoReward},
};
use rust_decimal::Decimal;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extensions::*;

/// What a promo code grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum RewardBody {
    /// Credit roubles
    RubBalance {
        /// Decimal amount
        amount: String,
    },

    /// Credit snowflakes
    EventBalance {
        /// Decimal amount
        amount: String,
    },

    /// Gift one unit of a product
    Product {
        /// Product granted
        product: Uuid,
    },

    /// Open one crate for free
    FreeCrate {
        /// Crate product opened
        product: Uuid,
    },

    /// Extra percent on a top-up
    TopupBonus {
        /// Whole percent added
        percent: u16,
    },
}

impl From<PromoReward> for RewardBody {
    fn from(reward: PromoReward) -> Self {
        match reward {
            PromoReward::RubBalance { amount } => Self::RubBalance {
                amount: amount.to_string(),
            },
            PromoReward::EventBalance { amount } => Self::EventBalance {
                amount: amount.to_string(),
            },
            PromoReward::Product { product } => Self::Product {
                product: product.into_uuid(),
            },
            PromoReward::FreeCrate { product } => Self::FreeCrate {
                product: product.into_uuid(),
            },
            PromoReward::TopupBonus { percent } => Self::TopupBonus { percent },
        }
    }
}

impl TryFrom<RewardBody> for PromoReward {
    type Error = StatusError;

    fn try_from(body: RewardBody) -> Result<Self, Self::Error> {
        let reward = match body {
            RewardBody::RubBalance { amount } => Self::RubBalance {
                amount: amount.parse::<Decimal>().or_400("could not parse amount")?,
            },
            RewardBody::EventBalance { amount } => Self::EventBalance {
                amount: amount.parse::<Decimal>().or_400("could not parse amount")?,
            },
            RewardBody::Product { product } => Self::Product {
                product: product.into(),
            },
            RewardBody::FreeCrate { product } => Self::FreeCrate {
                product: product.into(),
            },
            RewardBody::TopupBonus { percent } => Self::TopupBonus { percent },
        };

        Ok(reward)
    }
}

/// Promo code as shown to operators
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoCodeResponse {
    /// The unique identifier of the promo code
    pub uuid: Uuid,

    /// Upper-cased code
    pub code: String,

    /// Reward granted
    pub reward: RewardBody,

    /// Activation ceiling
    pub max_activations: u32,

    /// Activations so far
    pub current_activations: u32,

    /// User the code is reserved for
    pub user: Option<Uuid>,

    /// The date and time the promo code was created
    pub created_at: String,

    /// The date and time the promo code was last updated
    pub updated_at: String,
}

impl From<PromoCodeRecord> for PromoCodeResponse {
    fn from(record: PromoCodeRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            code: record.code,
            reward: record.reward.into(),
            max_activations: record.max_activations,
            current_activations: record.current_activations,
            user: record.user_uuid.map(|user| user.into_uuid()),
            created_at: record.created_at.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

const fn one() -> u32 {
    1
}

/// Create Promo Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreatePromoCodeRequest {
    /// Code players type in; stored upper-cased
    pub code: String,

    /// Reward granted
    pub reward: RewardBody,

    /// Activation ceiling
    #[serde(default = "one")]
    pub max_activations: u32,

    /// Reserve the code for one user
    #[serde(default)]
    pub user: Option<Uuid>,
}

impl CreatePromoCodeRequest {
    pub(crate) fn into_new(self) -> Result<NewPromoCode, StatusError> {
        Ok(NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: self.code,
            reward: self.reward.try_into()?,
            max_activations: self.max_activations,
            user: self.user.map(Into::into),
        })
    }
}

/// Update Promo Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdatePromoCodeRequest {
    /// Reward granted
    pub reward: RewardBody,

    /// Activation ceiling
    pub max_activations: u32,

    /// Reserve the code for one user
    #[serde(default)]
    pub user: Option<Uuid>,
}

impl TryFrom<UpdatePromoCodeRequest> for PromoCodeUpdate {
    type Error = StatusError;

    fn try_from(request: UpdatePromoCodeRequest) -> Result<Self, Self::Error> {
        Ok(PromoCodeUpdate {
            reward: request.reward.try_into()?,
            max_activations: request.max_activations,
            user: request.user.map(Into::into),
        })
    }
}
