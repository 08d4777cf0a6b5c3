//! Currencies

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to currency handling
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// The currency code is not one of the store currencies
    #[error("unknown currency code: {0}")]
    Unknown(String),
}

/// Store currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Real money balance, in roubles
    Rub,

    /// Event currency (snowflakes)
    Event,
}

impl Currency {
    /// Code used on the wire and in storage
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Event => "EVENT",
        }
    }

    /// Short symbol used when rendering amounts
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Rub => "₽",
            Currency::Event => "❄",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RUB" => Ok(Currency::Rub),
            "EVENT" => Ok(Currency::Event),
            _ => Err(CurrencyError::Unknown(s.to_string())),
        }
    }
}

/// A user's pair of balances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    /// Rouble balance
    pub balance: Decimal,

    /// Snowflake balance
    pub event_balance: Decimal,
}

impl Balances {
    /// Create a new pair of balances
    pub fn new(balance: Decimal, event_balance: Decimal) -> Self {
        Self {
            balance,
            event_balance,
        }
    }

    /// Balance held in the given currency
    pub fn of(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Rub => self.balance,
            Currency::Event => self.event_balance,
        }
    }

    /// Whether `amount` can be paid from the balance in `currency`
    pub fn can_afford(&self, currency: Currency, amount: Decimal) -> bool {
        self.of(currency) >= amount
    }
}
