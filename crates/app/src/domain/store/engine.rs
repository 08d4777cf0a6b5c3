//! Purchase engine
//!
//! Runs a single purchase inside a caller-owned transaction, so promo code redemption can grant
//! products through the same path and commit or roll back together with its own bookkeeping.

use std::sync::Arc;

use jiff::Timestamp;
use ostrum::{
    currency::Currency,
    pricing::MAX_QUANTITY,
    rewards::{self, DEFAULT_ICON_BASE_URL, ItemInfo, RewardSource, Rewards},
};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::domain::{
    accounts::{records::UserRecord, repository::PgAccountsRepository},
    catalog::{
        records::ProductRecord,
        repositories::{items::PgItemsRepository, products::PgProductsRepository},
    },
    deliveries::repository::PgDeliveriesRepository,
    ledger::{
        data::NewTransaction,
        records::{LedgerItem, TransactionKind},
        repository::PgLedgerRepository,
    },
    store::{
        data::{PurchaseMode, PurchaseOutcome, PurchaseRequest},
        errors::StoreServiceError,
    },
};

#[derive(Debug, Clone)]
pub(crate) struct PurchaseEngine {
    accounts: PgAccountsRepository,
    products: PgProductsRepository,
    items: PgItemsRepository,
    deliveries: PgDeliveriesRepository,
    ledger: PgLedgerRepository,
    icon_base_url: Arc<str>,
}

impl Default for PurchaseEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_BASE_URL)
    }
}

impl PurchaseEngine {
    #[must_use]
    pub(crate) fn new(icon_base_url: impl Into<Arc<str>>) -> Self {
        Self {
            accounts: PgAccountsRepository::new(),
            products: PgProductsRepository::new(),
            items: PgItemsRepository::new(),
            deliveries: PgDeliveriesRepository::new(),
            ledger: PgLedgerRepository::new(),
            icon_base_url: icon_base_url.into(),
        }
    }

    /// Validate, charge, roll and record one purchase.
    ///
    /// Every rejection happens before the first write. The buyer's row stays locked until the
    /// caller's transaction ends.
    pub(crate) async fn purchase(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &PurchaseRequest,
        now: Timestamp,
    ) -> Result<PurchaseOutcome, StoreServiceError> {
        if !(1..=MAX_QUANTITY).contains(&request.quantity) {
            return Err(StoreServiceError::InvalidQuantity);
        }

        let user = self
            .accounts
            .lock_user(tx, request.user)
            .await?
            .ok_or(StoreServiceError::NotFound)?;

        let product = self.products.get_product(tx, request.product).await?;

        let quote = product.price_tag().quote(request.quantity, now)?;
        let charge = Charge::for_purchase(&product, request.mode, quote.total_cost, quote.event_bonus);

        if charge.is_debit() && !user.balances().can_afford(quote.currency, quote.total_cost) {
            return Err(StoreServiceError::InsufficientFunds {
                currency: quote.currency,
            });
        }

        match request.mode {
            PurchaseMode::FreeOpening => self.consume_free_opening(tx, &user, request).await?,
            PurchaseMode::Paid if product.is_free => {
                self.claim_free_product(tx, &user, &product, request.quantity, now)
                    .await?;
            }
            PurchaseMode::Paid | PurchaseMode::Gift => {}
        }

        let balances = if charge.is_debit() {
            let (balance_delta, event_delta) = charge.deltas(quote.currency);

            self.accounts
                .apply_balance_delta(tx, user.uuid, balance_delta, event_delta)
                .await?
                .ok_or(StoreServiceError::InsufficientFunds {
                    currency: quote.currency,
                })?
                .balances()
        } else {
            user.balances()
        };

        let rolled = roll_rewards(product.reward_source(), request.quantity);
        let catalog = self.item_catalog(tx, &rolled).await?;
        let items = rewards::label(rolled, &catalog, &self.icon_base_url);

        self.deliveries
            .create_pending_items(tx, user.uuid, &request.server, &items)
            .await?;

        let transaction = self
            .ledger
            .record(
                tx,
                &NewTransaction {
                    user: user.uuid,
                    amount: charge.amount,
                    currency: quote.currency,
                    server_id: Some(request.server.clone()),
                    kind: match request.mode {
                        PurchaseMode::Paid => TransactionKind::Purchase,
                        PurchaseMode::Gift | PurchaseMode::FreeOpening => TransactionKind::Gift,
                    },
                    items: items.iter().map(LedgerItem::from).collect(),
                },
            )
            .await?;

        info!(
            user_uuid = %user.uuid,
            product_uuid = %product.uuid,
            server = %request.server,
            quantity = request.quantity,
            charged = %charge.amount,
            currency = %quote.currency,
            granted = items.len(),
            "purchase completed"
        );

        Ok(PurchaseOutcome {
            product_uuid: product.uuid,
            product_name: product.name,
            items,
            currency: quote.currency,
            charged: charge.amount,
            event_bonus: charge.event_bonus,
            balances,
            transaction,
        })
    }

    async fn consume_free_opening(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &UserRecord,
        request: &PurchaseRequest,
    ) -> Result<(), StoreServiceError> {
        if request.quantity != 1 {
            return Err(StoreServiceError::NoFreeOpening);
        }

        let consumed = self
            .accounts
            .consume_free_crate(tx, user.uuid, request.product)
            .await?;

        if !consumed {
            return Err(StoreServiceError::NoFreeOpening);
        }

        Ok(())
    }

    async fn claim_free_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &UserRecord,
        product: &ProductRecord,
        quantity: u32,
        now: Timestamp,
    ) -> Result<(), StoreServiceError> {
        if quantity != 1 {
            return Err(StoreServiceError::InvalidQuantity);
        }

        let Some(cooldown) = product.cooldown() else {
            return Ok(());
        };

        let last_claim = self
            .accounts
            .last_product_claim(tx, user.uuid, product.uuid)
            .await?;

        if let Some(claimed_at) = last_claim {
            let available_at = claimed_at.checked_add(cooldown).unwrap_or(Timestamp::MAX);

            if available_at > now {
                return Err(StoreServiceError::OnCooldown { available_at });
            }
        }

        self.accounts
            .record_product_claim(tx, user.uuid, product.uuid, now)
            .await?;

        Ok(())
    }

    async fn item_catalog(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rewards: &Rewards,
    ) -> Result<FxHashMap<String, ItemInfo>, StoreServiceError> {
        let mut codes: Vec<String> = rewards.iter().map(|r| r.item_code.clone()).collect();
        codes.sort_unstable();
        codes.dedup();

        let items = self.items.get_items_by_codes(tx, &codes).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let info = item.info();
                (item.code, info)
            })
            .collect())
    }
}

/// What a purchase moves between balances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Charge {
    amount: Decimal,
    event_bonus: Decimal,
}

impl Charge {
    const NONE: Self = Self {
        amount: Decimal::ZERO,
        event_bonus: Decimal::ZERO,
    };

    /// Gifts, free openings and free products move nothing.
    fn for_purchase(
        product: &ProductRecord,
        mode: PurchaseMode,
        total_cost: Decimal,
        event_bonus: Decimal,
    ) -> Self {
        if mode != PurchaseMode::Paid || product.is_free {
            return Self::NONE;
        }

        Self {
            amount: total_cost,
            event_bonus,
        }
    }

    fn is_debit(&self) -> bool {
        *self != Self::NONE
    }

    /// `(balance, event_balance)` deltas for a charge in `currency`.
    fn deltas(&self, currency: Currency) -> (Decimal, Decimal) {
        match currency {
            Currency::Rub => (-self.amount, self.event_bonus),
            Currency::Event => (Decimal::ZERO, -self.amount),
        }
    }
}

fn roll_rewards(source: RewardSource<'_>, quantity: u32) -> Rewards {
    let mut rng = rand::thread_rng();

    rewards::resolve(source, quantity, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rub_charge_debits_balance_and_credits_bonus() {
        let charge = Charge {
            amount: Decimal::from(50),
            event_bonus: Decimal::new(5, 1),
        };

        assert_eq!(
            charge.deltas(Currency::Rub),
            (Decimal::from(-50), Decimal::new(5, 1))
        );
    }

    #[test]
    fn event_charge_only_debits_event_balance() {
        let charge = Charge {
            amount: Decimal::from(5),
            event_bonus: Decimal::ZERO,
        };

        assert_eq!(
            charge.deltas(Currency::Event),
            (Decimal::ZERO, Decimal::from(-5))
        );
    }

    #[test]
    fn zero_cost_paid_purchase_is_not_a_debit() {
        assert!(!Charge::NONE.is_debit());
    }
}
