//! Store Data

use ostrum::{
    currency::{Balances, Currency},
    receipt::Receipt,
    rewards::GrantedItem,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    accounts::records::UserUuid, catalog::records::ProductUuid,
    ledger::records::TransactionRecord,
};

/// How a purchase is paid for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseMode {
    /// Debited from the buyer's balance, unless the product is free.
    #[default]
    Paid,

    /// Granted without touching any balance.
    Gift,

    /// Paid for with a free opening entitlement for the product.
    FreeOpening,
}

impl PurchaseMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Gift => "gift",
            Self::FreeOpening => "free_opening",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub user: UserUuid,
    pub product: ProductUuid,
    pub server: String,
    pub quantity: u32,
    pub mode: PurchaseMode,
}

impl PurchaseRequest {
    #[must_use]
    pub fn new(user: UserUuid, product: ProductUuid, server: impl Into<String>) -> Self {
        Self {
            user,
            product,
            server: server.into(),
            quantity: 1,
            mode: PurchaseMode::Paid,
        }
    }

    #[must_use]
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: PurchaseMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOutcome {
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub items: Vec<GrantedItem>,
    pub currency: Currency,
    pub charged: Decimal,
    pub event_bonus: Decimal,
    pub balances: Balances,
    pub transaction: TransactionRecord,
}

impl PurchaseOutcome {
    #[must_use]
    pub fn receipt(&self) -> Receipt {
        Receipt::new(
            self.items.clone(),
            self.currency,
            self.charged,
            self.event_bonus,
            self.balances,
        )
    }
}
