//! Ledger Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use ostrum::{currency::Currency, rewards::GrantedItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::accounts::records::UserUuid, uuids::TypedUuid};

pub type TransactionUuid = TypedUuid<TransactionRecord>;

#[derive(Debug, Error)]
#[error("unknown transaction kind: {0}")]
pub struct UnknownTransactionKind(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Purchase,
    Gift,
    Deposit,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "PURCHASE",
            Self::Gift => "GIFT",
            Self::Deposit => "DEPOSIT",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PURCHASE" => Ok(Self::Purchase),
            "GIFT" => Ok(Self::Gift),
            "DEPOSIT" => Ok(Self::Deposit),
            other => Err(UnknownTransactionKind(other.to_string())),
        }
    }
}

/// Snapshot of a granted item as it appears in the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerItem {
    pub name: String,
    pub quantity: u32,
}

impl From<&GrantedItem> for LedgerItem {
    fn from(item: &GrantedItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub uuid: TransactionUuid,
    pub user_uuid: UserUuid,
    pub amount: Decimal,
    pub currency: Currency,
    pub server_id: Option<String>,
    pub kind: TransactionKind,
    pub items: Vec<LedgerItem>,
    pub created_at: Timestamp,
}
