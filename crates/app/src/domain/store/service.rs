//! Store service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::store::{
        data::{PurchaseOutcome, PurchaseRequest},
        engine::PurchaseEngine,
        errors::StoreServiceError,
    },
};

#[derive(Debug, Clone)]
pub struct PgStoreService {
    db: Db,
    engine: PurchaseEngine,
}

impl PgStoreService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            engine: PurchaseEngine::default(),
        }
    }

    /// Host used for icons of items missing from the item catalog.
    #[must_use]
    pub fn with_icon_base_url(mut self, icon_base_url: impl Into<Arc<str>>) -> Self {
        self.engine = PurchaseEngine::new(icon_base_url);
        self
    }
}

#[async_trait]
impl StoreService for PgStoreService {
    #[tracing::instrument(
        name = "store.service.purchase",
        skip(self, request),
        fields(
            user_uuid = %request.user,
            product_uuid = %request.product,
            quantity = request.quantity,
            mode = ?request.mode,
        ),
        err
    )]
    async fn purchase(&self, request: PurchaseRequest) -> Result<PurchaseOutcome, StoreServiceError> {
        let mut tx = self.db.begin().await?;

        let outcome = self
            .engine
            .purchase(&mut tx, &request, Timestamp::now())
            .await?;

        tx.commit().await?;

        Ok(outcome)
    }
}

#[automock]
#[async_trait]
pub trait StoreService: Send + Sync {
    /// Buys, gifts or opens a product for a user on a game server.
    ///
    /// Balances, pending items and the ledger entry are written in one transaction; a rejected
    /// purchase changes nothing.
    async fn purchase(&self, request: PurchaseRequest) -> Result<PurchaseOutcome, StoreServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use ostrum::{
        currency::Currency,
        loot::LootEntry,
        pricing::{Discount, MAX_QUANTITY},
        rewards::Reward,
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            accounts::{AccountsService, records::UserUuid},
            catalog::{
                CatalogService,
                data::{NewItem, ProductDetails},
                records::ProductUuid,
            },
            deliveries::DeliveriesService,
            ledger::{LedgerService, records::TransactionKind},
            store::data::PurchaseMode,
        },
        test::{
            TestContext,
            helpers::{create_product, create_user, fund, simple_product},
        },
    };

    use super::*;

    fn kit(contents: Vec<Reward>) -> ProductDetails {
        ProductDetails {
            contents,
            ..simple_product("Kit", 50, Currency::Rub)
        }
    }

    #[tokio::test]
    async fn paid_rub_purchase_debits_and_credits_event_bonus() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, kit(vec![Reward::new("rifle.ak", 1)])).await?;

        fund(&ctx, user.uuid, Decimal::from(100), Decimal::ZERO).await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await?;

        assert_eq!(outcome.charged, Decimal::from(50));
        assert_eq!(outcome.balances.balance, Decimal::from(50));
        assert_eq!(outcome.balances.event_balance, Decimal::new(5, 1));

        let pending = ctx.deliveries.list_pending(user.uuid, None).await?;

        assert_eq!(pending.len(), 1);
        assert_eq!(pending.first().map(|p| p.server_id.as_str()), Some("srv_1"));

        let history = ctx.ledger.list_transactions(user.uuid).await?;

        assert_eq!(history.len(), 1);
        assert_eq!(
            history.first().map(|t| (t.kind, t.amount)),
            Some((TransactionKind::Purchase, Decimal::from(50)))
        );

        Ok(())
    }

    #[tokio::test]
    async fn active_discount_applies_to_every_unit() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                contents: vec![Reward::new("wood", 1000)],
                discount: Some(Discount::new(30, None)?),
                ..simple_product("Resource Kit", 100, Currency::Rub)
            },
        )
        .await?;

        fund(&ctx, user.uuid, Decimal::from(200), Decimal::ZERO).await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1").quantity(2))
            .await?;

        assert_eq!(outcome.charged, Decimal::from(140));
        assert_eq!(outcome.balances.balance, Decimal::from(60));

        Ok(())
    }

    #[tokio::test]
    async fn expired_discount_is_ignored() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let ended = Timestamp::now() - SignedDuration::from_hours(1);
        let product = create_product(
            &ctx,
            ProductDetails {
                discount: Some(Discount::new(50, Some(ended))?),
                ..kit(vec![Reward::new("wood", 1)])
            },
        )
        .await?;

        fund(&ctx, user.uuid, Decimal::from(50), Decimal::ZERO).await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await?;

        assert_eq!(outcome.charged, Decimal::from(50));

        Ok(())
    }

    #[tokio::test]
    async fn insufficient_funds_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, kit(vec![Reward::new("wood", 1)])).await?;

        fund(&ctx, user.uuid, Decimal::from(49), Decimal::ZERO).await?;

        let result = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await;

        assert!(
            matches!(
                result,
                Err(StoreServiceError::InsufficientFunds {
                    currency: Currency::Rub
                })
            ),
            "expected InsufficientFunds, got {result:?}"
        );

        let unchanged = ctx.accounts.get_user(user.uuid).await?;

        assert_eq!(unchanged.balance, Decimal::from(49));
        assert!(ctx.deliveries.list_pending(user.uuid, None).await?.is_empty());
        assert!(ctx.ledger.list_transactions(user.uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn event_purchase_uses_snowflakes_without_bonus() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                contents: vec![Reward::new("rifle.ak.ice", 1)],
                ..simple_product("Ice AK", 500, Currency::Event)
            },
        )
        .await?;

        fund(&ctx, user.uuid, Decimal::from(1000), Decimal::from(600)).await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await?;

        assert_eq!(outcome.balances.balance, Decimal::from(1000));
        assert_eq!(outcome.balances.event_balance, Decimal::from(100));
        assert_eq!(outcome.event_bonus, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn gift_skips_balance_and_records_zero_amount() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, kit(vec![Reward::new("wood", 1)])).await?;

        let outcome = ctx
            .store
            .purchase(
                PurchaseRequest::new(user.uuid, product.uuid, "srv_1").mode(PurchaseMode::Gift),
            )
            .await?;

        assert_eq!(outcome.charged, Decimal::ZERO);
        assert_eq!(outcome.balances.balance, Decimal::ZERO);
        assert_eq!(outcome.balances.event_balance, Decimal::ZERO);
        assert_eq!(outcome.transaction.kind, TransactionKind::Gift);
        assert_eq!(outcome.transaction.amount, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn contents_are_granted_once_per_unit() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            kit(vec![
                Reward::new("wood", 5000),
                Reward::new("stones", 3000),
                Reward::new("sulfur", 1000),
            ]),
        )
        .await?;

        fund(&ctx, user.uuid, Decimal::from(150), Decimal::ZERO).await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1").quantity(3))
            .await?;

        assert_eq!(outcome.items.len(), 9);
        assert_eq!(ctx.deliveries.list_pending(user.uuid, None).await?.len(), 9);
        assert_eq!(outcome.transaction.items.len(), 9);

        Ok(())
    }

    #[tokio::test]
    async fn crate_rolls_once_per_unit() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                is_crate: true,
                loot_table: vec![
                    LootEntry::new("rifle.ak", 1, 10.0),
                    LootEntry::new("ammo.rifle", 128, 90.0),
                ],
                ..simple_product("Snow Crate", 5, Currency::Event)
            },
        )
        .await?;

        fund(&ctx, user.uuid, Decimal::ZERO, Decimal::from(20)).await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1").quantity(4))
            .await?;

        assert_eq!(outcome.items.len(), 4);
        assert!(
            outcome
                .items
                .iter()
                .all(|item| item.item_code == "rifle.ak" || item.item_code == "ammo.rifle")
        );
        assert_eq!(outcome.balances.event_balance, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn empty_crate_grants_placeholder() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                is_crate: true,
                ..simple_product("Empty Crate", 0, Currency::Event)
            },
        )
        .await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await?;

        assert_eq!(outcome.items.len(), 1);
        assert_eq!(
            outcome.items.first().map(|i| (i.item_code.as_str(), i.quantity)),
            Some(("empty", 0))
        );

        Ok(())
    }

    #[tokio::test]
    async fn granted_items_use_catalog_names_with_icon_fallback() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;

        ctx.catalog
            .upsert_item(NewItem {
                code: "wood".to_string(),
                name: "Wood".to_string(),
                icon_url: "https://cdn.example/wood.png".to_string(),
                category: None,
            })
            .await?;

        let product = create_product(
            &ctx,
            kit(vec![Reward::new("wood", 1000), Reward::new("mystery", 1)]),
        )
        .await?;

        let store = PgStoreService::new(Db::new(ctx.db.pool().clone()))
            .with_icon_base_url("https://icons.example/items/");

        let outcome = store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1").mode(PurchaseMode::Gift))
            .await?;

        let labels: Vec<(&str, &str)> = outcome
            .items
            .iter()
            .map(|item| (item.name.as_str(), item.icon_url.as_str()))
            .collect();

        assert_eq!(
            labels,
            vec![
                ("Wood", "https://cdn.example/wood.png"),
                ("mystery", "https://icons.example/items/mystery.png"),
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, kit(vec![Reward::new("wood", 1)])).await?;

        let result = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1").quantity(0))
            .await;

        assert!(
            matches!(result, Err(StoreServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_or_product_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, kit(vec![Reward::new("wood", 1)])).await?;

        let no_user = ctx
            .store
            .purchase(PurchaseRequest::new(UserUuid::new(), product.uuid, "srv_1"))
            .await;
        let no_product = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, ProductUuid::new(), "srv_1"))
            .await;

        assert!(matches!(no_user, Err(StoreServiceError::NotFound)));
        assert!(matches!(no_product, Err(StoreServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_cannot_be_bought() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, kit(vec![Reward::new("wood", 1)])).await?;

        ctx.catalog.delete_product(product.uuid).await?;

        let result = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1").mode(PurchaseMode::Gift))
            .await;

        assert!(matches!(result, Err(StoreServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn server_is_not_checked_against_product_servers() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                servers: vec!["srv_1".to_string()],
                ..kit(vec![Reward::new("wood", 1)])
            },
        )
        .await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_2").mode(PurchaseMode::Gift))
            .await?;

        assert!(!product.is_offered_on("srv_2"));
        assert_eq!(outcome.transaction.server_id.as_deref(), Some("srv_2"));

        Ok(())
    }

    #[tokio::test]
    async fn free_product_respects_cooldown() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                is_free: true,
                cooldown_hours: Some(24),
                contents: vec![Reward::new("wood", 1000)],
                ..simple_product("Daily Bonus", 0, Currency::Rub)
            },
        )
        .await?;

        let first = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await?;

        assert_eq!(first.charged, Decimal::ZERO);
        assert_eq!(first.event_bonus, Decimal::ZERO);

        let second = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await;

        match second {
            Err(StoreServiceError::OnCooldown { available_at }) => {
                assert!(available_at > Timestamp::now() + SignedDuration::from_hours(23));
            }
            other => panic!("expected OnCooldown, got {other:?}"),
        }

        assert_eq!(ctx.deliveries.list_pending(user.uuid, None).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn priced_free_product_never_touches_balances() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                is_free: true,
                contents: vec![Reward::new("wood", 1000)],
                ..simple_product("Welcome Kit", 100, Currency::Rub)
            },
        )
        .await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await?;

        let after = ctx.accounts.get_user(user.uuid).await?;

        assert_eq!(outcome.charged, Decimal::ZERO);
        assert_eq!(outcome.event_bonus, Decimal::ZERO);
        assert_eq!(outcome.transaction.amount, Decimal::ZERO);
        assert_eq!(after.balance, Decimal::ZERO);
        assert_eq!(after.event_balance, Decimal::ZERO);
        assert_eq!(ctx.deliveries.list_pending(user.uuid, None).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn free_product_is_claimed_one_unit_at_a_time() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                is_free: true,
                cooldown_hours: Some(24),
                contents: vec![Reward::new("wood", 1000), Reward::new("stones", 500)],
                ..simple_product("Daily Bonus", 0, Currency::Rub)
            },
        )
        .await?;

        let bulk = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1").quantity(1000))
            .await;

        assert!(
            matches!(bulk, Err(StoreServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {bulk:?}"
        );
        assert!(ctx.deliveries.list_pending(user.uuid, None).await?.is_empty());

        let single = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await?;

        assert_eq!(single.items.len(), 2);
        assert_eq!(ctx.deliveries.list_pending(user.uuid, None).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn quantity_above_cap_is_rejected_before_any_write() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, kit(vec![Reward::new("wood", 1)])).await?;

        fund(&ctx, user.uuid, Decimal::from(1_000_000), Decimal::ZERO).await?;

        for quantity in [MAX_QUANTITY + 1, u32::MAX] {
            let result = ctx
                .store
                .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1").quantity(quantity))
                .await;

            assert!(
                matches!(result, Err(StoreServiceError::InvalidQuantity)),
                "expected InvalidQuantity for {quantity}, got {result:?}"
            );
        }

        let after = ctx.accounts.get_user(user.uuid).await?;

        assert_eq!(after.balance, Decimal::from(1_000_000));
        assert!(ctx.deliveries.list_pending(user.uuid, None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn free_opening_consumes_entitlement() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(
            &ctx,
            ProductDetails {
                is_crate: true,
                loot_table: vec![LootEntry::new("scrap", 50, 1.0)],
                ..simple_product("Snow Crate", 5, Currency::Event)
            },
        )
        .await?;

        ctx.accounts.grant_free_crate(user.uuid, product.uuid).await?;

        let request = PurchaseRequest::new(user.uuid, product.uuid, "srv_1")
            .mode(PurchaseMode::FreeOpening);

        let opened = ctx.store.purchase(request.clone()).await?;
        let again = ctx.store.purchase(request).await;

        assert_eq!(opened.charged, Decimal::ZERO);
        assert_eq!(opened.transaction.kind, TransactionKind::Gift);
        assert!(ctx.accounts.list_free_crates(user.uuid).await?.is_empty());
        assert!(
            matches!(again, Err(StoreServiceError::NoFreeOpening)),
            "expected NoFreeOpening, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn free_opening_requires_single_unit() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, simple_product("Crate", 5, Currency::Event)).await?;

        ctx.accounts.grant_free_crate(user.uuid, product.uuid).await?;

        let result = ctx
            .store
            .purchase(
                PurchaseRequest::new(user.uuid, product.uuid, "srv_1")
                    .quantity(2)
                    .mode(PurchaseMode::FreeOpening),
            )
            .await;

        assert!(matches!(result, Err(StoreServiceError::NoFreeOpening)));
        assert_eq!(ctx.accounts.list_free_crates(user.uuid).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn receipt_reflects_outcome() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;
        let product = create_product(&ctx, kit(vec![Reward::new("wood", 1000)])).await?;

        fund(&ctx, user.uuid, Decimal::from(50), Decimal::ZERO).await?;

        let outcome = ctx
            .store
            .purchase(PurchaseRequest::new(user.uuid, product.uuid, "srv_1"))
            .await?;

        let receipt = outcome.receipt();

        assert_eq!(receipt.charged(), Decimal::from(50));
        assert_eq!(receipt.total_quantity(), 1000);
        assert_eq!(receipt.balances(), outcome.balances);

        Ok(())
    }
}
