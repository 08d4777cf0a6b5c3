use clap::{Args, Subcommand};

mod claim;

#[derive(Debug, Args)]
pub(crate) struct DeliveryCommand {
    #[command(subcommand)]
    command: DeliverySubcommand,
}

#[derive(Debug, Subcommand)]
enum DeliverySubcommand {
    /// Mark a user's pending items on one server as delivered
    Claim(claim::ClaimArgs),
}

pub(crate) async fn run(command: DeliveryCommand) -> Result<(), String> {
    match command.command {
        DeliverySubcommand::Claim(args) => claim::run(args).await,
    }
}
