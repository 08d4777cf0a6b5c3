//! Notification Handlers

use std::sync::Arc;

use ostrum_app::domain::notifications::{NotificationsServiceError, records::NotificationRecord};
use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{extensions::*, state::State};

/// A notification as shown in the user's inbox
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationResponse {
    /// The unique identifier of the notification
    pub uuid: Uuid,

    /// Short heading
    pub title: String,

    /// Body text
    pub message: String,

    /// `info`, `success`, `error` or `gift`
    pub kind: String,

    /// Whether the notification went to every user
    pub global: bool,

    /// Whether this user has read it
    pub is_read: bool,

    /// When it was sent
    pub created_at: String,
}

impl From<NotificationRecord> for NotificationResponse {
    fn from(notification: NotificationRecord) -> Self {
        Self {
            uuid: notification.uuid.into_uuid(),
            title: notification.title,
            message: notification.message,
            kind: notification.kind.as_str().to_string(),
            global: notification.user_uuid.is_none(),
            is_read: notification.is_read,
            created_at: notification.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationsResponse {
    /// Own and global notifications, newest first
    pub notifications: Vec<NotificationResponse>,
}

/// List Notifications Handler
#[endpoint(tags("me"), summary = "List Notifications", security(("bearer_auth" = [])))]
pub(crate) async fn index(depot: &mut Depot) -> Result<Json<NotificationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let notifications = state
        .app
        .notifications
        .list_for_user(user.uuid)
        .await
        .or_500("failed to fetch notifications")?;

    Ok(Json(NotificationsResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
    }))
}

/// Mark Notification Read Handler
#[endpoint(
    tags("me"),
    summary = "Mark Notification Read",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Notification marked read"),
        (status_code = StatusCode::NOT_FOUND, description = "Notification not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn mark_read(
    notification: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    state
        .app
        .notifications
        .mark_read(user.uuid, notification.into_inner().into())
        .await
        .map_err(|error| match error {
            NotificationsServiceError::NotFound | NotificationsServiceError::InvalidReference => {
                StatusError::not_found().brief("Notification not found")
            }
            other => {
                error!("failed to mark notification read: {other}");

                StatusError::internal_server_error()
            }
        })?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use ostrum_app::domain::notifications::records::{NotificationKind, NotificationUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID};

    use super::*;

    fn make_notification(global: bool) -> NotificationRecord {
        NotificationRecord {
            uuid: NotificationUuid::new(),
            user_uuid: (!global).then_some(TEST_USER_UUID),
            title: "Referral reward".to_string(),
            message: "You earned 25 ₽".to_string(),
            kind: NotificationKind::Gift,
            is_read: false,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_index_lists_own_and_global() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .notifications
            .expect_list_for_user()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(vec![make_notification(false), make_notification(true)]));

        let response: NotificationsResponse =
            TestClient::get("http://example.com/me/notifications")
                .send(&mocks.service(Router::with_path("me/notifications").get(index)))
                .await
                .take_json()
                .await?;

        let global: Vec<_> = response.notifications.iter().map(|n| n.global).collect();

        assert_eq!(global, vec![false, true]);
        assert_eq!(response.notifications[0].kind, "gift");

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read() -> TestResult {
        let uuid = NotificationUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .notifications
            .expect_mark_read()
            .once()
            .withf(move |user, notification| *user == TEST_USER_UUID && *notification == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::post(format!("http://example.com/me/notifications/{uuid}/read"))
            .send(&mocks.service(
                Router::with_path("me/notifications/{notification}/read").post(mark_read),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_unknown_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .notifications
            .expect_mark_read()
            .once()
            .return_once(|_, _| Err(NotificationsServiceError::NotFound));

        let res = TestClient::post(format!(
            "http://example.com/me/notifications/{}/read",
            NotificationUuid::new()
        ))
        .send(&mocks.service(
            Router::with_path("me/notifications/{notification}/read").post(mark_read),
        ))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
