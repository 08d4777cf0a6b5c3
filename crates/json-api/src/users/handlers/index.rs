//! User Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, models::UserResponse, state::State, users::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    /// Every user, newest first
    pub users: Vec<UserResponse>,
}

/// User Index Handler
#[endpoint(tags("users"), summary = "List Users", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UsersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let users = state
        .app
        .accounts
        .list_users()
        .await
        .map_err(into_status_error)?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use ostrum_app::domain::accounts::records::Role;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_user};

    use super::*;

    #[tokio::test]
    async fn test_index_lists_users() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .accounts
            .expect_list_users()
            .once()
            .return_once(|| {
                Ok(vec![
                    make_user("newest", Role::User),
                    make_user("admin", Role::Admin),
                ])
            });

        let response: UsersResponse = TestClient::get("http://example.com/admin/users")
            .send(&mocks.admin_service(Router::with_path("admin/users").get(handler)))
            .await
            .take_json()
            .await?;

        let nicknames: Vec<_> = response.users.iter().map(|u| u.nickname.as_str()).collect();

        assert_eq!(nicknames, vec!["newest", "admin"]);
        assert_eq!(response.users[1].role, "admin");

        Ok(())
    }
}
