use clap::Args;
use ostrum_app::domain::accounts::records::UserUuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct ClaimArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// User UUID
    #[arg(long)]
    user: UserUuid,

    /// Server identifier, e.g. `srv_1`
    #[arg(long)]
    server: String,
}

pub(crate) async fn run(args: ClaimArgs) -> Result<(), String> {
    let ctx = args.database.context().await?;

    let delivered = ctx
        .deliveries
        .claim_pending(args.user, args.server)
        .await
        .map_err(|error| format!("failed to claim pending items: {error}"))?;

    if delivered.is_empty() {
        println!("nothing pending");
        return Ok(());
    }

    for item in delivered {
        println!("{} x{} ({})", item.item_code, item.quantity, item.name);
    }

    Ok(())
}
