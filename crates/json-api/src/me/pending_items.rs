//! Pending Items Handler

use std::sync::Arc;

use ostrum_app::domain::deliveries::records::PendingItemRecord;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, state::State};

/// An item waiting to be handed over in game
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PendingItemResponse {
    /// The unique identifier of the pending item
    pub uuid: Uuid,

    /// Game item code
    pub item_code: String,

    /// Display name
    pub name: String,

    /// Icon shown next to the item
    pub icon_url: String,

    /// Quantity to hand over
    pub quantity: u32,

    /// Game server the item is waiting on
    pub server_id: String,

    /// When the item was queued
    pub created_at: String,
}

impl From<PendingItemRecord> for PendingItemResponse {
    fn from(item: PendingItemRecord) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            item_code: item.item_code,
            name: item.name,
            icon_url: item.icon_url,
            quantity: item.quantity,
            server_id: item.server_id,
            created_at: item.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PendingItemsResponse {
    /// Undelivered items, oldest first
    pub items: Vec<PendingItemResponse>,
}

/// Pending Items Handler
#[endpoint(tags("me"), summary = "List Pending Items", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    server: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<PendingItemsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let items = state
        .app
        .deliveries
        .list_pending(user.uuid, server.into_inner())
        .await
        .or_500("failed to fetch pending items")?;

    Ok(Json(PendingItemsResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}
