//! Promo Codes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    accounts::records::UserUuid,
    catalog::records::ProductUuid,
    promocodes::{
        data::{NewPromoCode, PromoCodeUpdate},
        records::{PromoCodeRecord, PromoCodeUuid, PromoReward},
    },
};

const LIST_PROMOCODES_SQL: &str = include_str!("sql/list_promocodes.sql");
const LOCK_PROMOCODE_BY_CODE_SQL: &str = include_str!("sql/lock_promocode_by_code.sql");
const CREATE_PROMOCODE_SQL: &str = include_str!("sql/create_promocode.sql");
const UPDATE_PROMOCODE_SQL: &str = include_str!("sql/update_promocode.sql");
const DELETE_PROMOCODE_SQL: &str = include_str!("sql/delete_promocode.sql");
const HAS_USAGE_SQL: &str = include_str!("sql/has_usage.sql");
const CREATE_USAGE_SQL: &str = include_str!("sql/create_usage.sql");
const INCREMENT_ACTIVATIONS_SQL: &str = include_str!("sql/increment_activations.sql");

type RewardColumns = (&'static str, Option<Decimal>, Option<Uuid>, Option<i16>);

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromoCodesRepository;

impl PgPromoCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_promocodes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PromoCodeRecord>, sqlx::Error> {
        query_as::<Postgres, PromoCodeRecord>(LIST_PROMOCODES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch a code by its normalized form and lock it until the transaction ends.
    pub(crate) async fn lock_promocode_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<PromoCodeRecord>, sqlx::Error> {
        query_as::<Postgres, PromoCodeRecord>(LOCK_PROMOCODE_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promocode: &NewPromoCode,
    ) -> Result<PromoCodeRecord, sqlx::Error> {
        let (kind, amount, product, percent) = reward_columns(promocode.reward)?;

        query_as::<Postgres, PromoCodeRecord>(CREATE_PROMOCODE_SQL)
            .bind(promocode.uuid.into_uuid())
            .bind(&promocode.code)
            .bind(kind)
            .bind(amount)
            .bind(product)
            .bind(percent)
            .bind(activations_to_sql(promocode.max_activations)?)
            .bind(promocode.user.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promocode: PromoCodeUuid,
        update: &PromoCodeUpdate,
    ) -> Result<PromoCodeRecord, sqlx::Error> {
        let (kind, amount, product, percent) = reward_columns(update.reward)?;

        query_as::<Postgres, PromoCodeRecord>(UPDATE_PROMOCODE_SQL)
            .bind(promocode.into_uuid())
            .bind(kind)
            .bind(amount)
            .bind(product)
            .bind(percent)
            .bind(activations_to_sql(update.max_activations)?)
            .bind(update.user.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promocode: PromoCodeUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_PROMOCODE_SQL)
            .bind(promocode.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn has_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promocode: PromoCodeUuid,
        user: UserUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(HAS_USAGE_SQL)
            .bind(promocode.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Record that `user` used the code and count the activation.
    ///
    /// Returns `false` when the activation ceiling has been reached; the caller must roll back.
    pub(crate) async fn record_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promocode: PromoCodeUuid,
        user: UserUuid,
    ) -> Result<bool, sqlx::Error> {
        query(CREATE_USAGE_SQL)
            .bind(Uuid::now_v7())
            .bind(promocode.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?;

        let incremented = query(INCREMENT_ACTIVATIONS_SQL)
            .bind(promocode.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(incremented > 0)
    }
}

fn reward_columns(reward: PromoReward) -> Result<RewardColumns, sqlx::Error> {
    let kind = reward.kind();

    Ok(match reward {
        PromoReward::RubBalance { amount } | PromoReward::EventBalance { amount } => {
            (kind, Some(amount), None, None)
        }
        PromoReward::Product { product } | PromoReward::FreeCrate { product } => {
            (kind, None, Some(product.into_uuid()), None)
        }
        PromoReward::TopupBonus { percent } => {
            let percent = i16::try_from(percent).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

            (kind, None, None, Some(percent))
        }
    })
}

fn activations_to_sql(activations: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(activations).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_error(
    column: &str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: source.into(),
    }
}

fn decode_reward(row: &PgRow) -> sqlx::Result<PromoReward> {
    let kind: String = row.try_get("reward_kind")?;
    let amount: Option<Decimal> = row.try_get("reward_amount")?;
    let product: Option<Uuid> = row.try_get("reward_product_uuid")?;
    let percent: Option<i16> = row.try_get("reward_percent")?;

    let missing = || decode_error("reward_kind", format!("{kind} reward is missing its value"));

    match kind.as_str() {
        "RUB_BALANCE" => Ok(PromoReward::RubBalance {
            amount: amount.ok_or_else(missing)?,
        }),
        "EVENT_BALANCE" => Ok(PromoReward::EventBalance {
            amount: amount.ok_or_else(missing)?,
        }),
        "PRODUCT" => Ok(PromoReward::Product {
            product: product.map(ProductUuid::from_uuid).ok_or_else(missing)?,
        }),
        "FREE_CRATE" => Ok(PromoReward::FreeCrate {
            product: product.map(ProductUuid::from_uuid).ok_or_else(missing)?,
        }),
        "TOPUP_BONUS" => {
            let percent = percent.ok_or_else(missing)?;

            Ok(PromoReward::TopupBonus {
                percent: u16::try_from(percent).map_err(|e| decode_error("reward_percent", e))?,
            })
        }
        other => Err(decode_error(
            "reward_kind",
            format!("unknown reward kind: {other}"),
        )),
    }
}

impl<'r> FromRow<'r, PgRow> for PromoCodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let max_activations = u32::try_from(row.try_get::<i32, _>("max_activations")?)
            .map_err(|e| decode_error("max_activations", e))?;
        let current_activations = u32::try_from(row.try_get::<i32, _>("current_activations")?)
            .map_err(|e| decode_error("current_activations", e))?;

        Ok(Self {
            uuid: PromoCodeUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            reward: decode_reward(row)?,
            max_activations,
            current_activations,
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
