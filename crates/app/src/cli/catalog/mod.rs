use clap::{Args, Subcommand};

mod list;
mod seed;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// Load items, servers and products from a fixture set
    Seed(seed::SeedArgs),

    /// Print the active products
    List(list::ListArgs),
}

pub(crate) async fn run(command: CatalogCommand) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::Seed(args) => seed::run(args).await,
        CatalogSubcommand::List(args) => list::run(args).await,
    }
}
