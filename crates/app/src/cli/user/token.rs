use clap::Args;
use ostrum_app::domain::accounts::records::UserUuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct TokenArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// User UUID that should own the token
    #[arg(long)]
    user: UserUuid,
}

pub(crate) async fn run(args: TokenArgs) -> Result<(), String> {
    let ctx = args.database.context().await?;

    let issued = ctx
        .accounts
        .issue_token(args.user)
        .await
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("user_uuid: {}", issued.metadata.user_uuid);
    println!("token_created_at: {}", issued.metadata.created_at);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
