use std::path::PathBuf;

use clap::Args;
use ostrum::fixtures::Fixture;
use ostrum_app::domain::catalog::data::CatalogSeed;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct SeedArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Directory holding the `items/`, `servers/` and `products/` fixture folders
    #[arg(long, default_value = "./fixtures")]
    fixtures: PathBuf,

    /// Fixture set name
    #[arg(long, default_value = "default")]
    set: String,
}

pub(crate) async fn run(args: SeedArgs) -> Result<(), String> {
    let mut fixture = Fixture::with_base_path(args.fixtures.clone());

    fixture
        .load_set(&args.set)
        .map_err(|error| format!("failed to load fixture set '{}': {error}", args.set))?;

    let ctx = args.database.context().await?;

    let summary = ctx
        .catalog
        .seed(CatalogSeed::from(&fixture))
        .await
        .map_err(|error| format!("failed to seed catalog: {error}"))?;

    println!("items: {}", summary.items);
    println!("servers: {}", summary.servers);
    println!("products: {}", summary.products);

    if summary.products == 0 {
        println!("catalog already had products; none were added");
    }

    Ok(())
}
