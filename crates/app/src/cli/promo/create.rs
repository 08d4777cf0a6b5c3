use clap::{Args, ValueEnum};
use ostrum_app::domain::{
    accounts::records::UserUuid,
    catalog::records::ProductUuid,
    promocodes::{
        data::NewPromoCode,
        records::{PromoCodeUuid, PromoReward},
    },
};
use rust_decimal::Decimal;

use crate::cli::DatabaseArgs;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RewardKind {
    Rub,
    Event,
    Product,
    FreeCrate,
    TopupBonus,
}

#[derive(Debug, Args)]
pub(crate) struct CreatePromoArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Code players type in; stored upper-cased
    #[arg(long)]
    code: String,

    /// Reward granted on redemption
    #[arg(long, value_enum)]
    reward: RewardKind,

    /// Amount for `rub` and `event` rewards
    #[arg(long)]
    amount: Option<Decimal>,

    /// Product for `product` and `free-crate` rewards
    #[arg(long)]
    product: Option<ProductUuid>,

    /// Bonus percent for `topup-bonus` rewards
    #[arg(long)]
    percent: Option<u16>,

    /// Total activations across all users
    #[arg(long, default_value_t = 1)]
    max_activations: u32,

    /// Restrict the code to one user
    #[arg(long)]
    user: Option<UserUuid>,
}

pub(crate) async fn run(args: CreatePromoArgs) -> Result<(), String> {
    let reward = reward(&args)?;
    let ctx = args.database.context().await?;

    let promocode = ctx
        .promocodes
        .create_promocode(NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: args.code,
            reward,
            max_activations: args.max_activations,
            user: args.user,
        })
        .await
        .map_err(|error| format!("failed to create promo code: {error}"))?;

    println!("promocode_uuid: {}", promocode.uuid);
    println!("code: {}", promocode.code);
    println!("reward: {}", promocode.reward.kind());
    println!("max_activations: {}", promocode.max_activations);

    Ok(())
}

fn reward(args: &CreatePromoArgs) -> Result<PromoReward, String> {
    let amount = || args.amount.ok_or("--amount is required for this reward");
    let product = || args.product.ok_or("--product is required for this reward");

    Ok(match args.reward {
        RewardKind::Rub => PromoReward::RubBalance { amount: amount()? },
        RewardKind::Event => PromoReward::EventBalance { amount: amount()? },
        RewardKind::Product => PromoReward::Product {
            product: product()?,
        },
        RewardKind::FreeCrate => PromoReward::FreeCrate {
            product: product()?,
        },
        RewardKind::TopupBonus => PromoReward::TopupBonus {
            percent: args
                .percent
                .ok_or("--percent is required for a top-up bonus")?,
        },
    })
}
