use clap::Args;
use ostrum::currency::Currency;
use ostrum_app::domain::accounts::{data::BalanceAdjustment, records::UserUuid};
use rust_decimal::Decimal;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct BalanceArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// User UUID
    #[arg(long)]
    user: UserUuid,

    /// Signed amount; negative values debit
    #[arg(long, allow_hyphen_values = true)]
    amount: Decimal,

    /// `rub` or `event`
    #[arg(long, default_value = "rub")]
    currency: Currency,
}

pub(crate) async fn run(args: BalanceArgs) -> Result<(), String> {
    let ctx = args.database.context().await?;

    let user = ctx
        .accounts
        .adjust_balance(
            args.user,
            BalanceAdjustment {
                amount: args.amount,
                currency: args.currency,
            },
        )
        .await
        .map_err(|error| format!("failed to adjust balance: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("balance: {} {}", user.balance, Currency::Rub.symbol());
    println!("event_balance: {} {}", user.event_balance, Currency::Event.symbol());

    Ok(())
}
