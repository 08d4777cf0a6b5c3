//! Top-ups Data

use ostrum::currency::Balances;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{accounts::records::UserUuid, ledger::records::TransactionRecord};

/// Share of every deposit paid to the depositor's referrer
pub const REFERRAL_COMMISSION_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Top-up Request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopUpRequest {
    pub user: UserUuid,
    pub amount: Decimal,
    #[serde(default)]
    pub promo_code: Option<String>,
}

impl TopUpRequest {
    #[must_use]
    pub fn new(user: UserUuid, amount: Decimal) -> Self {
        Self {
            user,
            amount,
            promo_code: None,
        }
    }

    #[must_use]
    pub fn promo_code(mut self, code: impl Into<String>) -> Self {
        self.promo_code = Some(code.into());
        self
    }
}

/// Top-up Outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopUpOutcome {
    /// Deposit plus bonus
    pub credited: Decimal,
    pub bonus: Decimal,
    pub balances: Balances,
    pub transaction: TransactionRecord,
    pub referral_commission: Option<Decimal>,
}

/// Bonus credited on top of `amount` for a `percent` promo, rounded to kopecks.
#[must_use]
pub fn topup_bonus(amount: Decimal, percent: u16) -> Decimal {
    (amount * Decimal::from(percent) / Decimal::ONE_HUNDRED).round_dp(2)
}

/// Commission earned by a referrer on a deposit of `amount`.
#[must_use]
pub fn referral_commission(amount: Decimal) -> Decimal {
    (amount * REFERRAL_COMMISSION_RATE).round_dp(2)
}
