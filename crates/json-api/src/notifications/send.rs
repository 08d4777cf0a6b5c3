//! Send Notification Handlers

use std::sync::Arc;

use ostrum_app::domain::notifications::{
    NotificationsServiceError, data::NewNotification, records::NotificationKind,
};
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{extensions::*, me::notifications::NotificationResponse, state::State};

fn info() -> String {
    NotificationKind::Info.as_str().to_string()
}

/// Send Notification Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SendNotificationRequest {
    /// Short heading
    pub title: String,

    /// Body text
    pub message: String,

    /// `info`, `success`, `error` or `gift`
    #[serde(default = "info")]
    pub kind: String,
}

impl TryFrom<SendNotificationRequest> for NewNotification {
    type Error = StatusError;

    fn try_from(request: SendNotificationRequest) -> Result<Self, Self::Error> {
        let title = request.title.trim();
        let message = request.message.trim();

        if title.is_empty() || message.is_empty() {
            return Err(StatusError::bad_request().brief("Title and message are required"));
        }

        let kind = request
            .kind
            .to_ascii_lowercase()
            .parse::<NotificationKind>()
            .or_400("unknown notification kind")?;

        Ok(NewNotification::new(title, message, kind))
    }
}

fn into_status_error(error: NotificationsServiceError) -> StatusError {
    match error {
        NotificationsServiceError::NotFound | NotificationsServiceError::InvalidReference => {
            StatusError::not_found().brief("User not found")
        }
        NotificationsServiceError::MissingRequiredData | NotificationsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid notification payload")
        }
        other => {
            error!("failed to send notification: {other}");

            StatusError::internal_server_error()
        }
    }
}

/// Broadcast Notification Handler
///
/// Sends a notification every user sees in their inbox.
#[endpoint(
    tags("notifications"),
    summary = "Broadcast Notification",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Notification sent"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn broadcast(
    json: JsonBody<SendNotificationRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<NotificationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let notification = state
        .app
        .notifications
        .send_global(json.into_inner().try_into()?)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(notification.into()))
}

/// Notify User Handler
///
/// Sends a notification to a single user.
#[endpoint(
    tags("notifications"),
    summary = "Notify User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Notification sent"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn to_user(
    user: PathParam<Uuid>,
    json: JsonBody<SendNotificationRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<NotificationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let notification = state
        .app
        .notifications
        .send_to_user(user.into_inner().into(), json.into_inner().try_into()?)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(notification.into()))
}
