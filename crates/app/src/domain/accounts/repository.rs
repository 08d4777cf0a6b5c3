//! Accounts Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    accounts::{
        data::SignIn,
        records::{ApiTokenRecord, ApiTokenUuid, Role, UserRecord, UserUuid},
    },
    catalog::records::ProductUuid,
};

const SIGN_IN_SQL: &str = include_str!("sql/sign_in.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const LOCK_USER_SQL: &str = include_str!("sql/lock_user.sql");
const LIST_USERS_SQL: &str = include_str!("sql/list_users.sql");
const FIND_USER_BY_REFERRAL_CODE_SQL: &str = include_str!("sql/find_user_by_referral_code.sql");
const APPLY_BALANCE_DELTA_SQL: &str = include_str!("sql/apply_balance_delta.sql");
const CREDIT_REFERRAL_COMMISSION_SQL: &str = include_str!("sql/credit_referral_commission.sql");
const SET_REFERRER_SQL: &str = include_str!("sql/set_referrer.sql");
const GRANT_FREE_CRATE_SQL: &str = include_str!("sql/grant_free_crate.sql");
const LIST_FREE_CRATES_SQL: &str = include_str!("sql/list_free_crates.sql");
const CONSUME_FREE_CRATE_SQL: &str = include_str!("sql/consume_free_crate.sql");
const GET_PRODUCT_CLAIM_SQL: &str = include_str!("sql/get_product_claim.sql");
const RECORD_PRODUCT_CLAIM_SQL: &str = include_str!("sql/record_product_claim.sql");
const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const TOUCH_API_TOKEN_SQL: &str = include_str!("sql/touch_api_token.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccountsRepository;

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn sign_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: UserUuid,
        identity: &SignIn,
        role: Role,
        referral_code: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(SIGN_IN_SQL)
            .bind(uuid.into_uuid())
            .bind(&identity.steam_id)
            .bind(&identity.nickname)
            .bind(identity.avatar_url.as_deref())
            .bind(role.as_str())
            .bind(referral_code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a user and hold its row lock until the transaction ends.
    pub(crate) async fn lock_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LOCK_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LIST_USERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_user_by_referral_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        referral_code: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(FIND_USER_BY_REFERRAL_CODE_SQL)
            .bind(referral_code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Apply both deltas in one conditional update. Returns `None` when the user does not exist
    /// or either balance would become negative; nothing is written in that case.
    pub(crate) async fn apply_balance_delta(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        balance_delta: Decimal,
        event_balance_delta: Decimal,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(APPLY_BALANCE_DELTA_SQL)
            .bind(user.into_uuid())
            .bind(balance_delta)
            .bind(event_balance_delta)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn credit_referral_commission(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        referrer: UserUuid,
        commission: Decimal,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREDIT_REFERRAL_COMMISSION_SQL)
            .bind(referrer.into_uuid())
            .bind(commission)
            .fetch_one(&mut **tx)
            .await
    }

    /// Returns `None` when the user already has a referrer.
    pub(crate) async fn set_referrer(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        referrer: UserUuid,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(SET_REFERRER_SQL)
            .bind(user.into_uuid())
            .bind(referrer.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn grant_free_crate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), sqlx::Error> {
        query(GRANT_FREE_CRATE_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_free_crates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<ProductUuid>, sqlx::Error> {
        let uuids: Vec<Uuid> = query_scalar(LIST_FREE_CRATES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(uuids.into_iter().map(ProductUuid::from_uuid).collect())
    }

    /// Remove one free opening entitlement; returns whether there was one to remove.
    pub(crate) async fn consume_free_crate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CONSUME_FREE_CRATE_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    pub(crate) async fn last_product_claim(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        let claimed_at: Option<SqlxTimestamp> = query_scalar(GET_PRODUCT_CLAIM_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(claimed_at.map(SqlxTimestamp::to_jiff))
    }

    pub(crate) async fn record_product_claim(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        claimed_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(RECORD_PRODUCT_CLAIM_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(SqlxTimestamp::from(claimed_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn create_api_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: ApiTokenUuid,
        user: UserUuid,
        token_hash: &str,
    ) -> Result<ApiTokenRecord, sqlx::Error> {
        query_as::<Postgres, ApiTokenRecord>(CREATE_API_TOKEN_SQL)
            .bind(uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(token_hash)
            .fetch_one(&mut **tx)
            .await
    }

    /// Mark a token as used and return its owner.
    pub(crate) async fn touch_api_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<Option<UserUuid>, sqlx::Error> {
        let user: Option<Uuid> = query_scalar(TOUCH_API_TOKEN_SQL)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(user.map(UserUuid::from_uuid))
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        let role = role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            steam_id: row.try_get("steam_id")?,
            nickname: row.try_get("nickname")?,
            avatar_url: row.try_get("avatar_url")?,
            role,
            balance: row.try_get("balance")?,
            event_balance: row.try_get("event_balance")?,
            referral_code: row.try_get("referral_code")?,
            referred_by: row
                .try_get::<Option<Uuid>, _>("referred_by")?
                .map(UserUuid::from_uuid),
            total_referral_earnings: row.try_get("total_referral_earnings")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ApiTokenRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ApiTokenUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            last_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_used_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
