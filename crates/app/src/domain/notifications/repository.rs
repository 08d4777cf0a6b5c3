//! Notifications Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    accounts::records::UserUuid,
    notifications::{
        data::NewNotification,
        records::{NotificationKind, NotificationRecord, NotificationUuid},
    },
};

const CREATE_NOTIFICATION_SQL: &str = include_str!("sql/create_notification.sql");
const LIST_NOTIFICATIONS_FOR_USER_SQL: &str = include_str!("sql/list_notifications_for_user.sql");
const MARK_NOTIFICATION_READ_SQL: &str = include_str!("sql/mark_notification_read.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotificationsRepository;

impl PgNotificationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Create a notification; `user` of `None` makes it global.
    pub(crate) async fn create_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Option<UserUuid>,
        notification: &NewNotification,
    ) -> Result<NotificationRecord, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(CREATE_NOTIFICATION_SQL)
            .bind(NotificationUuid::new().into_uuid())
            .bind(user.map(UserUuid::into_uuid))
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.kind.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<NotificationRecord>, sqlx::Error> {
        query_as::<Postgres, NotificationRecord>(LIST_NOTIFICATIONS_FOR_USER_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Returns `false` when the notification is not visible to `user`.
    pub(crate) async fn mark_read(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        notification: NotificationUuid,
    ) -> Result<bool, sqlx::Error> {
        let visible: i64 = query_scalar(MARK_NOTIFICATION_READ_SQL)
            .bind(notification.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(visible > 0)
    }
}

impl<'r> FromRow<'r, PgRow> for NotificationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        let kind = kind
            .parse::<NotificationKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: NotificationUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            kind,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
