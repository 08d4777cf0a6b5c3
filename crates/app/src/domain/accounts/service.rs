//! Accounts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        accounts::{
            data::{BalanceAdjustment, SignIn},
            errors::AccountsServiceError,
            records::{ApiTokenUuid, IssuedToken, Role, UserRecord, UserUuid},
            referrals,
            repository::PgAccountsRepository,
            tokens,
        },
        catalog::records::ProductUuid,
        notifications::{
            data::NewNotification, records::NotificationKind,
            repository::PgNotificationsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
    notifications: PgNotificationsRepository,
    admin_steam_ids: Arc<[String]>,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
            notifications: PgNotificationsRepository::new(),
            admin_steam_ids: Arc::default(),
        }
    }

    /// Identities that are given the admin role when their account is first created.
    #[must_use]
    pub fn with_admin_steam_ids(mut self, steam_ids: impl IntoIterator<Item = String>) -> Self {
        self.admin_steam_ids = steam_ids.into_iter().collect();
        self
    }

    fn role_for(&self, steam_id: &str) -> Role {
        if self.admin_steam_ids.iter().any(|id| id == steam_id) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    #[tracing::instrument(
        name = "accounts.service.sign_in",
        skip(self, identity),
        fields(steam_id = %identity.steam_id),
        err
    )]
    async fn sign_in(&self, identity: SignIn) -> Result<UserRecord, AccountsServiceError> {
        if identity.steam_id.trim().is_empty() {
            return Err(AccountsServiceError::MissingRequiredData);
        }

        let referral_code = referrals::generate(&mut rand::thread_rng());
        let role = self.role_for(&identity.steam_id);

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .sign_in(&mut tx, UserUuid::new(), &identity, role, &referral_code)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let users = self.repository.list_users(&mut tx).await?;

        tx.commit().await?;

        Ok(users)
    }

    #[tracing::instrument(
        name = "accounts.service.adjust_balance",
        skip(self),
        fields(user_uuid = %user, currency = %adjustment.currency, amount = %adjustment.amount),
        err
    )]
    async fn adjust_balance(
        &self,
        user: UserUuid,
        adjustment: BalanceAdjustment,
    ) -> Result<UserRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        if self.repository.lock_user(&mut tx, user).await?.is_none() {
            return Err(AccountsServiceError::NotFound);
        }

        let (balance_delta, event_balance_delta) = adjustment.deltas();

        let updated = self
            .repository
            .apply_balance_delta(&mut tx, user, balance_delta, event_balance_delta)
            .await?
            .ok_or(AccountsServiceError::InsufficientFunds)?;

        if adjustment.amount > Decimal::ZERO {
            let gift = NewNotification::new(
                "Gift",
                format!(
                    "You received {} {}",
                    adjustment.amount,
                    adjustment.currency.symbol()
                ),
                NotificationKind::Gift,
            );

            self.notifications
                .create_notification(&mut tx, Some(user), &gift)
                .await?;
        }

        tx.commit().await?;

        info!(
            balance = %updated.balance,
            event_balance = %updated.event_balance,
            "adjusted balance"
        );

        Ok(updated)
    }

    #[tracing::instrument(
        name = "accounts.service.set_referrer",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn set_referrer(
        &self,
        user: UserUuid,
        referral_code: String,
    ) -> Result<UserRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .repository
            .lock_user(&mut tx, user)
            .await?
            .ok_or(AccountsServiceError::NotFound)?;

        if current.referred_by.is_some() {
            return Err(AccountsServiceError::AlreadyReferred);
        }

        let referrer = self
            .repository
            .find_user_by_referral_code(&mut tx, &referrals::normalize(&referral_code))
            .await?
            .ok_or(AccountsServiceError::NotFound)?;

        if referrer.uuid == user {
            return Err(AccountsServiceError::InvalidReferral);
        }

        let updated = self
            .repository
            .set_referrer(&mut tx, user, referrer.uuid)
            .await?
            .ok_or(AccountsServiceError::AlreadyReferred)?;

        tx.commit().await?;

        info!(referrer_uuid = %referrer.uuid, "set referrer");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "accounts.service.grant_free_crate",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn grant_free_crate(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .grant_free_crate(&mut tx, user, product)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_free_crates(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ProductUuid>, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let crates = self.repository.list_free_crates(&mut tx, user).await?;

        tx.commit().await?;

        Ok(crates)
    }

    #[tracing::instrument(
        name = "accounts.service.issue_token",
        skip(self),
        fields(user_uuid = %user, token_uuid = tracing::field::Empty),
        err
    )]
    async fn issue_token(&self, user: UserUuid) -> Result<IssuedToken, AccountsServiceError> {
        let token = tokens::generate();

        let mut tx = self.db.begin().await?;

        let metadata = self
            .repository
            .create_api_token(&mut tx, ApiTokenUuid::new(), user, &tokens::hash(&token))
            .await?;

        tx.commit().await?;

        tracing::Span::current().record("token_uuid", tracing::field::display(metadata.uuid));

        Ok(IssuedToken { token, metadata })
    }

    async fn authenticate(&self, token: String) -> Result<UserRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .touch_api_token(&mut tx, &tokens::hash(token.trim()))
            .await?
            .ok_or(AccountsServiceError::Unauthorized)?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Finds the user behind an external identity, creating them on first sign-in.
    async fn sign_in(&self, identity: SignIn) -> Result<UserRecord, AccountsServiceError>;

    /// Retrieves a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, AccountsServiceError>;

    /// Lists all users, newest first.
    async fn list_users(&self) -> Result<Vec<UserRecord>, AccountsServiceError>;

    /// Applies a signed adjustment to one balance.
    async fn adjust_balance(
        &self,
        user: UserUuid,
        adjustment: BalanceAdjustment,
    ) -> Result<UserRecord, AccountsServiceError>;

    /// Records who referred `user`, once.
    async fn set_referrer(
        &self,
        user: UserUuid,
        referral_code: String,
    ) -> Result<UserRecord, AccountsServiceError>;

    /// Lets `user` open `product` once at no cost.
    async fn grant_free_crate(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), AccountsServiceError>;

    /// Lists the crates `user` may open for free.
    async fn list_free_crates(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ProductUuid>, AccountsServiceError>;

    /// Issues a new bearer token for `user`.
    async fn issue_token(&self, user: UserUuid) -> Result<IssuedToken, AccountsServiceError>;

    /// Resolves a bearer token to its user.
    async fn authenticate(&self, token: String) -> Result<UserRecord, AccountsServiceError>;
}
