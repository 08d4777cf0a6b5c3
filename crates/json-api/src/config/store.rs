//! Storefront Config

use clap::Args;
use ostrum::rewards::DEFAULT_ICON_BASE_URL;
use ostrum_app::context::AppSettings;

/// Storefront settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Host serving icons for items missing from the item catalog
    #[arg(long, env = "ITEM_ICON_BASE_URL", default_value = DEFAULT_ICON_BASE_URL)]
    pub icon_base_url: String,

    /// Steam identities granted the admin role on first sign-in
    #[arg(long, env = "ADMIN_STEAM_IDS", value_delimiter = ',')]
    pub admin_steam_ids: Vec<String>,
}

impl StoreConfig {
    /// Settings handed to the application services.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            icon_base_url: self.icon_base_url.clone(),
            admin_steam_ids: self
                .admin_steam_ids
                .iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }
}
