use clap::Args;
use ostrum::currency::Currency;
use ostrum_app::domain::{accounts::records::UserUuid, topups::data::TopUpRequest};
use rust_decimal::Decimal;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct TopUpArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// User UUID
    #[arg(long)]
    user: UserUuid,

    /// Amount paid, in roubles
    #[arg(long)]
    amount: Decimal,

    /// Optional top-up bonus promo code
    #[arg(long)]
    promo_code: Option<String>,
}

pub(crate) async fn run(args: TopUpArgs) -> Result<(), String> {
    let ctx = args.database.context().await?;

    let outcome = ctx
        .topups
        .top_up(TopUpRequest {
            user: args.user,
            amount: args.amount,
            promo_code: args.promo_code,
        })
        .await
        .map_err(|error| format!("failed to top up: {error}"))?;

    let rub = Currency::Rub.symbol();

    println!("transaction_uuid: {}", outcome.transaction.uuid);
    println!("credited: {} {rub}", outcome.credited);
    println!("bonus: {} {rub}", outcome.bonus);
    println!("balance: {} {rub}", outcome.balances.balance);

    if let Some(commission) = outcome.referral_commission {
        println!("referral_commission: {commission} {rub}");
    }

    Ok(())
}
