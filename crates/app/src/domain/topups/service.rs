//! Top-ups service.

use async_trait::async_trait;
use mockall::automock;
use ostrum::currency::Currency;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        accounts::{
            records::{UserRecord, UserUuid},
            repository::PgAccountsRepository,
        },
        ledger::{data::NewTransaction, records::TransactionKind, repository::PgLedgerRepository},
        notifications::{
            data::NewNotification, records::NotificationKind,
            repository::PgNotificationsRepository,
        },
        promocodes::{
            PromoCodesServiceError,
            records::{PromoCodeRecord, PromoReward},
            repository::PgPromoCodesRepository,
            rules::{self, RedemptionContext},
        },
        topups::{
            data::{TopUpOutcome, TopUpRequest, referral_commission, topup_bonus},
            errors::TopUpsServiceError,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgTopUpsService {
    db: Db,
    accounts: PgAccountsRepository,
    promocodes: PgPromoCodesRepository,
    notifications: PgNotificationsRepository,
    ledger: PgLedgerRepository,
}

impl PgTopUpsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            accounts: PgAccountsRepository::new(),
            promocodes: PgPromoCodesRepository::new(),
            notifications: PgNotificationsRepository::new(),
            ledger: PgLedgerRepository::new(),
        }
    }

    async fn pay_referrer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        depositor: &UserRecord,
        referrer: UserUuid,
        amount: Decimal,
    ) -> Result<Decimal, TopUpsServiceError> {
        let commission = referral_commission(amount);

        self.accounts
            .credit_referral_commission(tx, referrer, commission)
            .await?;

        self.notifications
            .create_notification(
                tx,
                Some(referrer),
                &NewNotification::new(
                    "Referral reward",
                    format!(
                        "You earned {commission} ₽ from a top-up by your referral {}!",
                        depositor.nickname
                    ),
                    NotificationKind::Gift,
                ),
            )
            .await?;

        Ok(commission)
    }
}

#[async_trait]
impl TopUpsService for PgTopUpsService {
    #[tracing::instrument(
        name = "topups.service.top_up",
        skip(self, request),
        fields(
            user_uuid = %request.user,
            amount = %request.amount,
            promo_code = request.promo_code.as_deref(),
        ),
        err
    )]
    async fn top_up(&self, request: TopUpRequest) -> Result<TopUpOutcome, TopUpsServiceError> {
        if request.amount <= Decimal::ZERO {
            return Err(TopUpsServiceError::InvalidAmount);
        }

        let mut tx = self.db.begin().await?;

        let user = self
            .accounts
            .lock_user(&mut tx, request.user)
            .await?
            .ok_or(TopUpsServiceError::NotFound)?;

        let promocode: Option<PromoCodeRecord> = match request.promo_code.as_deref() {
            Some(code) => Some(
                rules::lock_redeemable(
                    &self.promocodes,
                    &mut tx,
                    code,
                    user.uuid,
                    RedemptionContext::TopUp,
                )
                .await?,
            ),
            None => None,
        };

        let percent = match promocode.as_ref().map(|p| p.reward) {
            Some(PromoReward::TopupBonus { percent }) => percent,
            Some(_) => return Err(PromoCodesServiceError::WrongContext.into()),
            None => 0,
        };

        let bonus = topup_bonus(request.amount, percent);
        let credited = request.amount + bonus;

        let balances = self
            .accounts
            .apply_balance_delta(&mut tx, user.uuid, credited, Decimal::ZERO)
            .await?
            .ok_or(TopUpsServiceError::NotFound)?
            .balances();

        if let Some(promocode) = &promocode {
            let recorded = self
                .promocodes
                .record_usage(&mut tx, promocode.uuid, user.uuid)
                .await?;

            if !recorded {
                return Err(PromoCodesServiceError::LimitExceeded.into());
            }
        }

        let referral_commission = match user.referred_by {
            Some(referrer) => Some(
                self.pay_referrer(&mut tx, &user, referrer, request.amount)
                    .await?,
            ),
            None => None,
        };

        let transaction = self
            .ledger
            .record(
                &mut tx,
                &NewTransaction {
                    user: user.uuid,
                    amount: request.amount,
                    currency: Currency::Rub,
                    server_id: None,
                    kind: TransactionKind::Deposit,
                    items: Vec::new(),
                },
            )
            .await?;

        tx.commit().await?;

        info!(
            %credited,
            %bonus,
            referral_commission = ?referral_commission,
            "balance topped up"
        );

        Ok(TopUpOutcome {
            credited,
            bonus,
            balances,
            transaction,
            referral_commission,
        })
    }
}

#[automock]
#[async_trait]
pub trait TopUpsService: Send + Sync {
    /// Credits a deposit, plus any `TOPUP_BONUS` promo bonus, and pays the depositor's referrer.
    async fn top_up(&self, request: TopUpRequest) -> Result<TopUpOutcome, TopUpsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            accounts::AccountsService, ledger::LedgerService, notifications::NotificationsService,
            promocodes::PromoCodesService,
        },
        test::{
            TestContext,
            helpers::{create_promocode, create_user},
        },
    };

    use super::*;

    #[tokio::test]
    async fn top_up_credits_balance_and_records_deposit() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;

        let outcome = ctx
            .topups
            .top_up(TopUpRequest::new(user.uuid, Decimal::from(500)))
            .await?;

        assert_eq!(outcome.credited, Decimal::from(500));
        assert_eq!(outcome.bonus, Decimal::ZERO);
        assert_eq!(outcome.balances.balance, Decimal::from(500));
        assert_eq!(outcome.referral_commission, None);
        assert_eq!(outcome.transaction.kind, TransactionKind::Deposit);
        assert_eq!(outcome.transaction.amount, Decimal::from(500));
        assert_eq!(outcome.transaction.server_id, None);

        let history = ctx.ledger.list_transactions(user.uuid).await?;

        assert_eq!(history.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn topup_bonus_code_adds_percentage_once() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;

        create_promocode(&ctx, "WIPE15", PromoReward::TopupBonus { percent: 15 }, 100, None)
            .await?;

        let outcome = ctx
            .topups
            .top_up(TopUpRequest::new(user.uuid, Decimal::from(1000)).promo_code("wipe15"))
            .await?;

        assert_eq!(outcome.bonus, Decimal::from(150));
        assert_eq!(outcome.balances.balance, Decimal::from(1150));

        let again = ctx
            .topups
            .top_up(TopUpRequest::new(user.uuid, Decimal::from(1000)).promo_code("WIPE15"))
            .await;

        assert!(
            matches!(
                again,
                Err(TopUpsServiceError::Promo(PromoCodesServiceError::AlreadyUsed))
            ),
            "expected AlreadyUsed, got {again:?}"
        );
        assert_eq!(
            ctx.accounts.get_user(user.uuid).await?.balance,
            Decimal::from(1150)
        );

        let activations = ctx
            .promocodes
            .list_promocodes()
            .await?
            .into_iter()
            .find(|p| p.code == "WIPE15")
            .map(|p| p.current_activations);

        assert_eq!(activations, Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn storefront_code_is_rejected_at_top_up() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;

        create_promocode(
            &ctx,
            "WELCOME",
            PromoReward::RubBalance {
                amount: Decimal::from(100),
            },
            10,
            None,
        )
        .await?;

        let result = ctx
            .topups
            .top_up(TopUpRequest::new(user.uuid, Decimal::from(500)).promo_code("WELCOME"))
            .await;

        assert!(
            matches!(
                result,
                Err(TopUpsServiceError::Promo(PromoCodesServiceError::WrongContext))
            ),
            "expected WrongContext, got {result:?}"
        );
        assert_eq!(ctx.accounts.get_user(user.uuid).await?.balance, Decimal::ZERO);
        assert!(ctx.ledger.list_transactions(user.uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn referrer_earns_commission_and_is_notified() -> TestResult {
        let ctx = TestContext::new().await;
        let referrer = create_user(&ctx, "referrer").await?;
        let player = create_user(&ctx, "player").await?;

        ctx.accounts
            .set_referrer(player.uuid, referrer.referral_code.clone())
            .await?;

        let outcome = ctx
            .topups
            .top_up(TopUpRequest::new(player.uuid, Decimal::from(500)))
            .await?;

        assert_eq!(outcome.referral_commission, Some(Decimal::from(25)));

        let referrer = ctx.accounts.get_user(referrer.uuid).await?;

        assert_eq!(referrer.balance, Decimal::from(25));
        assert_eq!(referrer.total_referral_earnings, Decimal::from(25));

        let notifications = ctx.notifications.list_for_user(referrer.uuid).await?;

        assert!(
            notifications
                .iter()
                .any(|n| n.kind == NotificationKind::Gift && n.message.contains("player")),
            "expected a referral notification, got {notifications:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "player").await?;

        let zero = ctx
            .topups
            .top_up(TopUpRequest::new(user.uuid, Decimal::ZERO))
            .await;
        let negative = ctx
            .topups
            .top_up(TopUpRequest::new(user.uuid, Decimal::from(-10)))
            .await;

        assert!(matches!(zero, Err(TopUpsServiceError::InvalidAmount)));
        assert!(matches!(negative, Err(TopUpsServiceError::InvalidAmount)));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .topups
            .top_up(TopUpRequest::new(UserUuid::new(), Decimal::from(100)))
            .await;

        assert!(
            matches!(result, Err(TopUpsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
