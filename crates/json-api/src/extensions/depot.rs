//! Depot helper extensions.

use std::any::Any;

use ostrum_app::domain::accounts::records::UserRecord;
use salvo::prelude::{Depot, StatusError};

const USER_DEPOT_KEY: &str = "ostrum.user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_user(&mut self, user: UserRecord);

    /// The user the bearer token belongs to.
    fn user_or_401(&self) -> Result<&UserRecord, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user(&mut self, user: UserRecord) {
        self.insert(USER_DEPOT_KEY, user);
    }

    fn user_or_401(&self) -> Result<&UserRecord, StatusError> {
        self.get::<UserRecord>(USER_DEPOT_KEY)
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
