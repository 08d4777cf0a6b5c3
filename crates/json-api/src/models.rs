//! Response bodies shared across routes
//!
//! Money is always rendered as a decimal string so clients never round through floats.

use ostrum::{currency::Balances, rewards::GrantedItem};
use ostrum_app::domain::{accounts::records::UserRecord, ledger::records::TransactionRecord};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Both balances of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct BalancesBody {
    /// Rouble balance
    pub balance: String,

    /// Snowflake balance
    pub event_balance: String,
}

impl From<Balances> for BalancesBody {
    fn from(balances: Balances) -> Self {
        Self {
            balance: balances.balance.to_string(),
            event_balance: balances.event_balance.to_string(),
        }
    }
}

/// An item granted by a purchase or promo code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct GrantedItemBody {
    /// Game item code
    pub item_code: String,

    /// Display name
    pub name: String,

    /// Icon shown next to the item
    pub icon_url: String,

    /// Quantity granted
    pub quantity: u32,
}

impl From<GrantedItem> for GrantedItemBody {
    fn from(item: GrantedItem) -> Self {
        Self {
            item_code: item.item_code,
            name: item.name,
            icon_url: item.icon_url,
            quantity: item.quantity,
        }
    }
}

/// Item name and quantity as recorded in the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct LedgerItemBody {
    /// Item name at the time of the transaction
    pub name: String,

    /// Quantity granted
    pub quantity: u32,
}

/// One row of a user's transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct TransactionResponse {
    /// The unique identifier of the transaction
    pub uuid: Uuid,

    /// Amount actually charged or deposited
    pub amount: String,

    /// `RUB` or `EVENT`
    pub currency: String,

    /// Game server the items went to, if any
    pub server_id: Option<String>,

    /// `PURCHASE`, `GIFT` or `DEPOSIT`
    pub kind: String,

    /// Items granted
    pub items: Vec<LedgerItemBody>,

    /// When the transaction was recorded
    pub created_at: String,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(transaction: TransactionRecord) -> Self {
        Self {
            uuid: transaction.uuid.into_uuid(),
            amount: transaction.amount.to_string(),
            currency: transaction.currency.code().to_string(),
            server_id: transaction.server_id,
            kind: transaction.kind.as_str().to_string(),
            items: transaction
                .items
                .into_iter()
                .map(|item| LedgerItemBody {
                    name: item.name,
                    quantity: item.quantity,
                })
                .collect(),
            created_at: transaction.created_at.to_string(),
        }
    }
}

/// A storefront account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    /// The unique identifier of the user
    pub uuid: Uuid,

    /// Steam ID the account signs in with
    pub steam_id: String,

    /// Display name
    pub nickname: String,

    /// Avatar image
    pub avatar_url: Option<String>,

    /// `user` or `admin`
    pub role: String,

    /// Rouble and snowflake balances
    pub balances: BalancesBody,

    /// Code other players enter to name this user as their referrer
    pub referral_code: String,

    /// The user who referred this one
    pub referred_by: Option<Uuid>,

    /// Commission earned from referrals so far
    pub total_referral_earnings: String,

    /// When the account was created
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            uuid: user.uuid.into_uuid(),
            balances: user.balances().into(),
            steam_id: user.steam_id,
            nickname: user.nickname,
            avatar_url: user.avatar_url,
            role: user.role.as_str().to_string(),
            referral_code: user.referral_code,
            referred_by: user.referred_by.map(|referrer| referrer.into_uuid()),
            total_referral_earnings: user.total_referral_earnings.to_string(),
            created_at: user.created_at.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use jiff::Timestamp;
    use ostrum::currency::Currency;
    use ostrum_app::domain::ledger::records::{LedgerItem, TransactionKind, TransactionUuid};
    use rust_decimal::Decimal;

    use crate::test_helpers::TEST_USER_UUID;

    use super::*;

    pub(crate) fn make_transaction(kind: TransactionKind, amount: i64) -> TransactionRecord {
        TransactionRecord {
            uuid: TransactionUuid::new(),
            user_uuid: TEST_USER_UUID,
            amount: Decimal::from(amount),
            currency: Currency::Rub,
            server_id: Some("srv_1".to_string()),
            kind,
            items: vec![LedgerItem {
                name: "Wood".to_string(),
                quantity: 1000,
            }],
            created_at: Timestamp::UNIX_EPOCH,
        }
    }
}
