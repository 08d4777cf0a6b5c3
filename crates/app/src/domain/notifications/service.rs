//! Notifications service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        accounts::records::UserUuid,
        notifications::{
            data::NewNotification,
            errors::NotificationsServiceError,
            records::{NotificationRecord, NotificationUuid},
            repository::PgNotificationsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgNotificationsService {
    db: Db,
    repository: PgNotificationsRepository,
}

impl PgNotificationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgNotificationsRepository::new(),
        }
    }
}

#[async_trait]
impl NotificationsService for PgNotificationsService {
    #[tracing::instrument(
        name = "notifications.service.send_to_user",
        skip(self, notification),
        fields(user_uuid = %user, kind = %notification.kind),
        err
    )]
    async fn send_to_user(
        &self,
        user: UserUuid,
        notification: NewNotification,
    ) -> Result<NotificationRecord, NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .create_notification(&mut tx, Some(user), &notification)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "notifications.service.send_global",
        skip(self, notification),
        fields(kind = %notification.kind),
        err
    )]
    async fn send_global(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .create_notification(&mut tx, None, &notification)
            .await?;

        tx.commit().await?;

        info!(notification_uuid = %record.uuid, "sent global notification");

        Ok(record)
    }

    async fn list_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let notifications = self.repository.list_for_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(notifications)
    }

    async fn mark_read(
        &self,
        user: UserUuid,
        notification: NotificationUuid,
    ) -> Result<(), NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let visible = self
            .repository
            .mark_read(&mut tx, user, notification)
            .await?;

        if !visible {
            return Err(NotificationsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    /// Sends a notification to one user.
    async fn send_to_user(
        &self,
        user: UserUuid,
        notification: NewNotification,
    ) -> Result<NotificationRecord, NotificationsServiceError>;

    /// Sends a notification every user sees.
    async fn send_global(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, NotificationsServiceError>;

    /// Lists a user's own and global notifications, newest first.
    async fn list_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<NotificationRecord>, NotificationsServiceError>;

    /// Marks a notification visible to `user` as read by them.
    async fn mark_read(
        &self,
        user: UserUuid,
        notification: NotificationUuid,
    ) -> Result<(), NotificationsServiceError>;
}
