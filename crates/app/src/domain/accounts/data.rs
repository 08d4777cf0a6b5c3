//! Accounts Data

use ostrum::currency::Currency;
use rust_decimal::Decimal;

/// Identity handed over by the identity provider after a successful handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub steam_id: String,
    pub nickname: String,
    pub avatar_url: Option<String>,
}

/// Signed operator adjustment of one balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceAdjustment {
    pub amount: Decimal,
    pub currency: Currency,
}

impl BalanceAdjustment {
    /// The `(balance, event_balance)` deltas this adjustment applies.
    #[must_use]
    pub fn deltas(&self) -> (Decimal, Decimal) {
        match self.currency {
            Currency::Rub => (self.amount, Decimal::ZERO),
            Currency::Event => (Decimal::ZERO, self.amount),
        }
    }
}
