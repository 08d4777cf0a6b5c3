//! App Router

use salvo::Router;

use crate::{auth, me, notifications, products, promocodes, store, users};

/// Storefront routes: the public catalogue, the signed-in player's routes and the admin routes.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(player_router())
                .push(admin_router()),
        )
}

fn player_router() -> Router {
    Router::new()
        .push(
            Router::with_path("me")
                .get(me::profile::handler)
                .push(Router::with_path("pending-items").get(me::pending_items::handler))
                .push(Router::with_path("transactions").get(me::transactions::handler))
                .push(Router::with_path("referrer").post(me::referrer::handler))
                .push(
                    Router::with_path("notifications")
                        .get(me::notifications::index)
                        .push(
                            Router::with_path("{notification}/read")
                                .post(me::notifications::mark_read),
                        ),
                ),
        )
        .push(Router::with_path("store/purchase").post(store::purchase::handler))
        .push(Router::with_path("promocodes/redeem").post(promocodes::redeem::handler))
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .hoop(auth::require_admin)
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("promocodes")
                .get(promocodes::index::handler)
                .post(promocodes::create::handler)
                .push(
                    Router::with_path("{promocode}")
                        .put(promocodes::update::handler)
                        .delete(promocodes::delete::handler),
                ),
        )
        .push(Router::with_path("notifications").post(notifications::send::broadcast))
        .push(
            Router::with_path("users").get(users::index::handler).push(
                Router::with_path("{user}")
                    .push(Router::with_path("balance").post(users::balance::handler))
                    .push(Router::with_path("top-ups").post(users::top_up::handler))
                    .push(Router::with_path("free-crates").post(users::free_crates::handler))
                    .push(
                        Router::with_path("notifications").post(notifications::send::to_user),
                    ),
            ),
        )
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use ostrum_app::domain::{
        accounts::{
            AccountsServiceError,
            records::{Role, UserUuid},
        },
        catalog::records::ProductUuid,
        notifications::records::{NotificationRecord, NotificationUuid},
    };
    use salvo::{http::StatusCode, test::TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_user};

    use super::*;

    #[tokio::test]
    async fn test_catalogue_is_public() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_list_products()
            .once()
            .return_once(|| Ok(vec![]));

        let res = TestClient::get("http://example.com/products")
            .send(&mocks.service_without_user(app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_player_routes_require_token() -> TestResult {
        let res = TestClient::get("http://example.com/me")
            .send(&Mocks::default().service_without_user(app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_routes_reject_players() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_authenticate()
            .once()
            .withf(|token| token == "player-token")
            .return_once(|_| Ok(make_user("player", Role::User)));

        let res = TestClient::get("http://example.com/admin/users")
            .bearer_auth("player-token")
            .send(&mocks.service_without_user(app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_can_grant_free_crates_and_notify() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_authenticate()
            .times(2)
            .returning(|_| Ok(make_user("operator", Role::Admin)));

        mocks
            .accounts
            .expect_grant_free_crate()
            .once()
            .return_once(|_, _| Ok(()));

        mocks
            .accounts
            .expect_list_free_crates()
            .once()
            .return_once(|_| Ok(vec![]));

        mocks
            .notifications
            .expect_send_global()
            .once()
            .return_once(|notification| {
                Ok(NotificationRecord {
                    uuid: NotificationUuid::new(),
                    user_uuid: None,
                    title: notification.title,
                    message: notification.message,
                    kind: notification.kind,
                    is_read: false,
                    created_at: Timestamp::UNIX_EPOCH,
                })
            });

        let service = mocks.service_without_user(app_router());

        let granted = TestClient::post(format!(
            "http://example.com/admin/users/{}/free-crates",
            UserUuid::new()
        ))
        .bearer_auth("admin-token")
        .json(&json!({ "product": ProductUuid::new().into_uuid() }))
        .send(&service)
        .await;

        let notified = TestClient::post("http://example.com/admin/notifications")
            .bearer_auth("admin-token")
            .json(&json!({ "title": "Wipe", "message": "Friday" }))
            .send(&service)
            .await;

        assert_eq!(granted.status_code, Some(StatusCode::OK));
        assert_eq!(notified.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_authenticate()
            .once()
            .return_once(|_| Err(AccountsServiceError::Unauthorized));

        let res = TestClient::get("http://example.com/me")
            .bearer_auth("stale")
            .send(&mocks.service_without_user(app_router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
