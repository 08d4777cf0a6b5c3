use std::io;

use clap::Args;
use ostrum_app::domain::{
    accounts::records::UserUuid,
    catalog::records::ProductUuid,
    store::data::{PurchaseMode, PurchaseRequest},
};

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct GiftArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Recipient UUID
    #[arg(long)]
    user: UserUuid,

    /// Product UUID
    #[arg(long)]
    product: ProductUuid,

    /// Server the items are delivered on
    #[arg(long)]
    server: String,

    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

pub(crate) async fn run(args: GiftArgs) -> Result<(), String> {
    let ctx = args.database.context().await?;

    let outcome = ctx
        .store
        .purchase(
            PurchaseRequest::new(args.user, args.product, args.server)
                .quantity(args.quantity)
                .mode(PurchaseMode::Gift),
        )
        .await
        .map_err(|error| format!("failed to gift product: {error}"))?;

    println!("transaction_uuid: {}", outcome.transaction.uuid);
    println!("product: {}", outcome.product_name);

    outcome
        .receipt()
        .write_to(io::stdout())
        .map_err(|error| format!("failed to print receipt: {error}"))
}
