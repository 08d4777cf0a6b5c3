//! Deliveries service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        accounts::records::UserUuid,
        deliveries::{
            errors::DeliveriesServiceError, records::PendingItemRecord,
            repository::PgDeliveriesRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgDeliveriesService {
    db: Db,
    repository: PgDeliveriesRepository,
}

impl PgDeliveriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDeliveriesRepository::new(),
        }
    }
}

#[async_trait]
impl DeliveriesService for PgDeliveriesService {
    async fn list_pending(
        &self,
        user: UserUuid,
        server: Option<String>,
    ) -> Result<Vec<PendingItemRecord>, DeliveriesServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self
            .repository
            .list_pending(&mut tx, user, server.as_deref())
            .await?;

        tx.commit().await?;

        Ok(items)
    }

    #[tracing::instrument(
        name = "deliveries.service.claim_pending",
        skip(self),
        fields(user_uuid = %user, server = %server),
        err
    )]
    async fn claim_pending(
        &self,
        user: UserUuid,
        server: String,
    ) -> Result<Vec<PendingItemRecord>, DeliveriesServiceError> {
        let mut tx = self.db.begin().await?;

        let delivered = self.repository.claim_pending(&mut tx, user, &server).await?;

        tx.commit().await?;

        info!(count = delivered.len(), "delivered pending items");

        Ok(delivered)
    }
}

#[automock]
#[async_trait]
pub trait DeliveriesService: Send + Sync {
    /// Lists a user's undelivered items, optionally for one server only.
    async fn list_pending(
        &self,
        user: UserUuid,
        server: Option<String>,
    ) -> Result<Vec<PendingItemRecord>, DeliveriesServiceError>;

    /// Marks every pending item for `user` on `server` as delivered and returns them.
    async fn claim_pending(
        &self,
        user: UserUuid,
        server: String,
    ) -> Result<Vec<PendingItemRecord>, DeliveriesServiceError>;
}
