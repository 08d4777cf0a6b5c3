//! Account Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use ostrum::currency::Balances;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// API Token UUID
pub type ApiTokenUuid = TypedUuid<ApiTokenRecord>;

/// Unknown role stored against a user
#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(String);

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// User Record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub steam_id: String,
    pub nickname: String,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub balance: Decimal,
    pub event_balance: Decimal,
    pub referral_code: String,
    pub referred_by: Option<UserUuid>,
    pub total_referral_earnings: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserRecord {
    #[must_use]
    pub fn balances(&self) -> Balances {
        Balances::new(self.balance, self.event_balance)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// API Token Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTokenRecord {
    pub uuid: ApiTokenUuid,
    pub user_uuid: UserUuid,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
}

/// A freshly issued bearer token. The raw token is never stored and cannot be recovered.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub metadata: ApiTokenRecord,
}
