//! Promo codes service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use ostrum::currency::Balances;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        accounts::{records::UserUuid, repository::PgAccountsRepository},
        promocodes::{
            data::{NewPromoCode, PromoCodeUpdate, normalize_code},
            errors::PromoCodesServiceError,
            records::{PromoCodeRecord, PromoCodeUuid, PromoReward, Redemption},
            repository::PgPromoCodesRepository,
            rules::{self, RedemptionContext},
        },
        store::{
            data::{PurchaseMode, PurchaseRequest},
            engine::PurchaseEngine,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPromoCodesService {
    db: Db,
    repository: PgPromoCodesRepository,
    accounts: PgAccountsRepository,
    engine: PurchaseEngine,
}

impl PgPromoCodesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromoCodesRepository::new(),
            accounts: PgAccountsRepository::new(),
            engine: PurchaseEngine::default(),
        }
    }

    /// Host used for icons of granted items missing from the item catalog.
    #[must_use]
    pub fn with_icon_base_url(mut self, icon_base_url: impl Into<Arc<str>>) -> Self {
        self.engine = PurchaseEngine::new(icon_base_url);
        self
    }
}

#[async_trait]
impl PromoCodesService for PgPromoCodesService {
    async fn list_promocodes(&self) -> Result<Vec<PromoCodeRecord>, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let promocodes = self.repository.list_promocodes(&mut tx).await?;

        tx.commit().await?;

        Ok(promocodes)
    }

    #[tracing::instrument(
        name = "promocodes.service.create_promocode",
        skip(self, promocode),
        fields(promocode_uuid = %promocode.uuid, kind = promocode.reward.kind()),
        err
    )]
    async fn create_promocode(
        &self,
        promocode: NewPromoCode,
    ) -> Result<PromoCodeRecord, PromoCodesServiceError> {
        let promocode = NewPromoCode {
            code: normalize_code(&promocode.code),
            ..promocode
        };

        if promocode.code.is_empty() {
            return Err(PromoCodesServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_promocode(&mut tx, &promocode).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "promocodes.service.update_promocode",
        skip(self, update),
        fields(promocode_uuid = %promocode),
        err
    )]
    async fn update_promocode(
        &self,
        promocode: PromoCodeUuid,
        update: PromoCodeUpdate,
    ) -> Result<PromoCodeRecord, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_promocode(&mut tx, promocode, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "promocodes.service.delete_promocode",
        skip(self),
        fields(promocode_uuid = %promocode),
        err
    )]
    async fn delete_promocode(&self, promocode: PromoCodeUuid) -> Result<(), PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_promocode(&mut tx, promocode).await?;

        if rows_affected == 0 {
            return Err(PromoCodesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "promocodes.service.redeem",
        skip(self, code),
        fields(user_uuid = %user, server = ?server),
        err
    )]
    async fn redeem(
        &self,
        user: UserUuid,
        code: String,
        server: Option<String>,
    ) -> Result<Redemption, PromoCodesServiceError> {
        let mut tx = self.db.begin().await?;

        let promocode = rules::lock_redeemable(
            &self.repository,
            &mut tx,
            &code,
            user,
            RedemptionContext::Storefront,
        )
        .await?;

        let (balances, granted, description) = match promocode.reward {
            PromoReward::RubBalance { amount } => {
                let balances = self.credit(&mut tx, user, amount, Decimal::ZERO).await?;

                (
                    balances,
                    Vec::new(),
                    format!("You received {} ₽ on your balance!", amount.normalize()),
                )
            }
            PromoReward::EventBalance { amount } => {
                let balances = self.credit(&mut tx, user, Decimal::ZERO, amount).await?;

                (
                    balances,
                    Vec::new(),
                    format!("You received {} ❄ on your event balance!", amount.normalize()),
                )
            }
            PromoReward::Product { product } | PromoReward::FreeCrate { product } => {
                let server = server
                    .filter(|server| !server.trim().is_empty())
                    .ok_or(PromoCodesServiceError::ServerRequired)?;

                let request = PurchaseRequest::new(user, product, server).mode(PurchaseMode::Gift);
                let outcome = self
                    .engine
                    .purchase(&mut tx, &request, Timestamp::now())
                    .await?;

                let description = format!(
                    "\"{}\" has been added to your inventory!",
                    outcome.product_name
                );

                (outcome.balances, outcome.items, description)
            }
            PromoReward::TopupBonus { .. } => return Err(PromoCodesServiceError::WrongContext),
        };

        if !self
            .repository
            .record_usage(&mut tx, promocode.uuid, user)
            .await?
        {
            return Err(PromoCodesServiceError::LimitExceeded);
        }

        tx.commit().await?;

        info!(
            promocode_uuid = %promocode.uuid,
            kind = promocode.reward.kind(),
            "promo code redeemed"
        );

        Ok(Redemption {
            code: promocode.code,
            reward: promocode.reward,
            description,
            balances,
            granted,
        })
    }
}

impl PgPromoCodesService {
    async fn credit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        balance: Decimal,
        event_balance: Decimal,
    ) -> Result<Balances, PromoCodesServiceError> {
        let updated = self
            .accounts
            .apply_balance_delta(tx, user, balance, event_balance)
            .await?
            .ok_or(PromoCodesServiceError::InvalidReference)?;

        Ok(updated.balances())
    }
}

#[automock]
#[async_trait]
pub trait PromoCodesService: Send + Sync {
    /// Lists every promo code, newest first.
    async fn list_promocodes(&self) -> Result<Vec<PromoCodeRecord>, PromoCodesServiceError>;

    /// Creates a promo code. The code is stored trimmed and upper-cased.
    async fn create_promocode(
        &self,
        promocode: NewPromoCode,
    ) -> Result<PromoCodeRecord, PromoCodesServiceError>;

    /// Replaces a promo code's reward, ceiling and binding. The code itself is immutable.
    async fn update_promocode(
        &self,
        promocode: PromoCodeUuid,
        update: PromoCodeUpdate,
    ) -> Result<PromoCodeRecord, PromoCodesServiceError>;

    async fn delete_promocode(&self, promocode: PromoCodeUuid) -> Result<(), PromoCodesServiceError>;

    /// Redeems a storefront promo code for `user`.
    ///
    /// Product rewards are delivered to `server`, which is then required. A rejected or failed
    /// redemption records no usage.
    async fn redeem(
        &self,
        user: UserUuid,
        code: String,
        server: Option<String>,
    ) -> Result<Redemption, PromoCodesServiceError>;
}
