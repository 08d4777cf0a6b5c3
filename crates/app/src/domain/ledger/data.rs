//! Ledger Data

use ostrum::currency::Currency;
use rust_decimal::Decimal;

use crate::domain::{
    accounts::records::UserUuid,
    ledger::records::{LedgerItem, TransactionKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub user: UserUuid,
    pub amount: Decimal,
    pub currency: Currency,
    pub server_id: Option<String>,
    pub kind: TransactionKind,
    pub items: Vec<LedgerItem>,
}
