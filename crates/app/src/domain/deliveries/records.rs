//! Delivery Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use serde::Serialize;
use thiserror::Error;

use crate::{domain::accounts::records::UserUuid, uuids::TypedUuid};

pub type PendingItemUuid = TypedUuid<PendingItemRecord>;

#[derive(Debug, Error)]
#[error("unknown delivery status: {0}")]
pub struct UnknownDeliveryStatus(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
}

impl DeliveryStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Delivered => "DELIVERED",
        }
    }
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryStatus {
    type Err = UnknownDeliveryStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "DELIVERED" => Ok(Self::Delivered),
            other => Err(UnknownDeliveryStatus(other.to_string())),
        }
    }
}

/// An item waiting to be handed over on a game server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingItemRecord {
    pub uuid: PendingItemUuid,
    pub user_uuid: UserUuid,
    pub item_code: String,
    pub name: String,
    pub icon_url: String,
    pub quantity: u32,
    pub server_id: String,
    pub status: DeliveryStatus,
    pub created_at: Timestamp,
    pub delivered_at: Option<Timestamp>,
}
