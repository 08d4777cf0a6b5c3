use clap::{Args, Subcommand};

mod gift;

#[derive(Debug, Args)]
pub(crate) struct StoreCommand {
    #[command(subcommand)]
    command: StoreSubcommand,
}

#[derive(Debug, Subcommand)]
enum StoreSubcommand {
    /// Grant a product to a user without charging them
    Gift(gift::GiftArgs),
}

pub(crate) async fn run(command: StoreCommand) -> Result<(), String> {
    match command.command {
        StoreSubcommand::Gift(args) => gift::run(args).await,
    }
}
