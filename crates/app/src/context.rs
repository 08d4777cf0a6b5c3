//! App Context

use std::sync::Arc;

use ostrum::rewards::DEFAULT_ICON_BASE_URL;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        accounts::{AccountsService, PgAccountsService},
        catalog::{CatalogService, PgCatalogService},
        deliveries::{DeliveriesService, PgDeliveriesService},
        ledger::{LedgerService, PgLedgerService},
        notifications::{NotificationsService, PgNotificationsService},
        promocodes::{PgPromoCodesService, PromoCodesService},
        store::{PgStoreService, StoreService},
        topups::{PgTopUpsService, TopUpsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Deployment settings the services need beyond a database connection
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Host serving item icons for items missing from the catalog
    pub icon_base_url: String,

    /// Identities promoted to admin on first sign-in
    pub admin_steam_ids: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            admin_steam_ids: Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub accounts: Arc<dyn AccountsService>,
    pub catalog: Arc<dyn CatalogService>,
    pub store: Arc<dyn StoreService>,
    pub promocodes: Arc<dyn PromoCodesService>,
    pub topups: Arc<dyn TopUpsService>,
    pub deliveries: Arc<dyn DeliveriesService>,
    pub ledger: Arc<dyn LedgerService>,
    pub notifications: Arc<dyn NotificationsService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(Db::new(pool), settings))
    }

    #[must_use]
    pub fn from_db(db: Db, settings: AppSettings) -> Self {
        let icon_base_url: Arc<str> = Arc::from(settings.icon_base_url);

        Self {
            accounts: Arc::new(
                PgAccountsService::new(db.clone()).with_admin_steam_ids(settings.admin_steam_ids),
            ),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            store: Arc::new(
                PgStoreService::new(db.clone()).with_icon_base_url(Arc::clone(&icon_base_url)),
            ),
            promocodes: Arc::new(
                PgPromoCodesService::new(db.clone()).with_icon_base_url(icon_base_url),
            ),
            topups: Arc::new(PgTopUpsService::new(db.clone())),
            deliveries: Arc::new(PgDeliveriesService::new(db.clone())),
            ledger: Arc::new(PgLedgerService::new(db.clone())),
            notifications: Arc::new(PgNotificationsService::new(db)),
        }
    }
}
