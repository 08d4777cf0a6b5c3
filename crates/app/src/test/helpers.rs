//! Test Helpers

use ostrum::{
    currency::Currency,
    fixtures::{Fixture, FixtureError},
};
use rust_decimal::Decimal;

use crate::{
    domain::{
        accounts::{
            AccountsService, AccountsServiceError,
            data::SignIn,
            records::{UserRecord, UserUuid},
        },
        catalog::{
            CatalogService, CatalogServiceError,
            data::{NewProduct, ProductDetails},
            records::{ProductRecord, ProductUuid},
        },
        promocodes::{
            PromoCodesService, PromoCodesServiceError,
            data::NewPromoCode,
            records::{PromoCodeRecord, PromoCodeUuid, PromoReward},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_user(
    ctx: &TestContext,
    nickname: &str,
) -> Result<UserRecord, AccountsServiceError> {
    ctx.accounts
        .sign_in(SignIn {
            steam_id: format!("steam_{nickname}"),
            nickname: nickname.to_string(),
            avatar_url: None,
        })
        .await
}

/// Overwrite both balances without going through the ledger.
pub(crate) async fn fund(
    ctx: &TestContext,
    user: UserUuid,
    balance: Decimal,
    event_balance: Decimal,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET balance = $2, event_balance = $3 WHERE uuid = $1")
        .bind(user.into_uuid())
        .bind(balance)
        .bind(event_balance)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}

/// A plain, always-available product with no contents.
pub(crate) fn simple_product(name: &str, price: i64, currency: Currency) -> ProductDetails {
    ProductDetails {
        name: name.to_string(),
        price: Decimal::from(price),
        currency,
        image_url: None,
        category: None,
        is_crate: false,
        is_free: false,
        contents: Vec::new(),
        loot_table: Vec::new(),
        servers: Vec::new(),
        discount: None,
        event_bonus: None,
        cooldown_hours: None,
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    details: ProductDetails,
) -> Result<ProductRecord, CatalogServiceError> {
    ctx.catalog
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            details,
        })
        .await
}

pub(crate) async fn create_promocode(
    ctx: &TestContext,
    code: &str,
    reward: PromoReward,
    max_activations: u32,
    user: Option<UserUuid>,
) -> Result<PromoCodeRecord, PromoCodesServiceError> {
    ctx.promocodes
        .create_promocode(NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: code.to_string(),
            reward,
            max_activations,
            user,
        })
        .await
}

/// The seed catalog shipped in the workspace `fixtures/` directory.
pub(crate) fn default_fixture() -> Result<Fixture, FixtureError> {
    let mut fixture = Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures"));

    fixture.load_set("default")?;

    Ok(fixture)
}
