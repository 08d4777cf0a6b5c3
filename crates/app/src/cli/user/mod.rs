use clap::{Args, Subcommand};

mod balance;
mod create;
mod token;
mod top_up;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Credit or debit one of a user's balances
    Balance(balance::BalanceArgs),

    /// Create an account, or refresh it if the Steam ID already signed in
    Create(create::CreateUserArgs),

    /// Issue an API token for a user
    Token(token::TokenArgs),

    /// Record a balance deposit
    TopUp(top_up::TopUpArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::Balance(args) => balance::run(args).await,
        UserSubcommand::Create(args) => create::run(args).await,
        UserSubcommand::Token(args) => token::run(args).await,
        UserSubcommand::TopUp(args) => top_up::run(args).await,
    }
}
