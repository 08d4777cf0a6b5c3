use clap::{Args, Parser, Subcommand};
use ostrum_app::{
    context::{AppContext, AppSettings},
    database::{self, Db},
};

mod catalog;
mod db;
mod delivery;
mod promo;
mod store;
mod user;

#[derive(Debug, Parser)]
#[command(name = "ostrum-app", about = "Ostrum operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Catalog(catalog::CatalogCommand),
    User(user::UserCommand),
    Promo(promo::PromoCommand),
    Delivery(delivery::DeliveryCommand),
    Store(store::StoreCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Catalog(command) => catalog::run(command).await,
            Commands::User(command) => user::run(command).await,
            Commands::Promo(command) => promo::run(command).await,
            Commands::Delivery(command) => delivery::run(command).await,
            Commands::Store(command) => store::run(command).await,
        }
    }
}

/// Connection options shared by every command that touches the database
#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Host serving icons for items missing from the item catalog
    #[arg(long, env = "ITEM_ICON_BASE_URL")]
    icon_base_url: Option<String>,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        database::connect(&self.database_url)
            .await
            .map(Db::new)
            .map_err(|error| format!("failed to connect to database: {error}"))
    }

    pub(crate) async fn context(&self) -> Result<AppContext, String> {
        self.context_promoting(Vec::new()).await
    }

    /// Context whose sign-ins give `admin_steam_ids` the admin role on creation.
    pub(crate) async fn context_promoting(
        &self,
        admin_steam_ids: Vec<String>,
    ) -> Result<AppContext, String> {
        let mut settings = AppSettings {
            admin_steam_ids,
            ..AppSettings::default()
        };

        if let Some(icon_base_url) = &self.icon_base_url {
            settings.icon_base_url.clone_from(icon_base_url);
        }

        Ok(AppContext::from_db(self.connect().await?, settings))
    }
}
