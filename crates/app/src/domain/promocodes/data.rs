//! Promo Code Data

use crate::domain::{
    accounts::records::UserUuid,
    promocodes::records::{PromoCodeUuid, PromoReward},
};

/// Codes are matched trimmed and upper-cased.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPromoCode {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub reward: PromoReward,
    pub max_activations: u32,
    pub user: Option<UserUuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCodeUpdate {
    pub reward: PromoReward,
    pub max_activations: u32,
    pub user: Option<UserUuid>,
}
