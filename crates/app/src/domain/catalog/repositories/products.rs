//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use ostrum::{currency::Currency, loot::LootEntry, pricing::Discount, rewards::Reward};
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
    types::Json,
};

use crate::domain::catalog::{
    data::ProductDetails,
    records::{ProductRecord, ProductUuid},
};

const LIST_PRODUCTS_SQL: &str = include_str!("../sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("../sql/get_product.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("../sql/count_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("../sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("../sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("../sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<i64, sqlx::Error> {
        query_scalar(COUNT_PRODUCTS_SQL).fetch_one(&mut **tx).await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: ProductUuid,
        details: &ProductDetails,
    ) -> Result<ProductRecord, sqlx::Error> {
        let cooldown_hours = cooldown_to_sql(details.cooldown_hours)?;

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(uuid.into_uuid())
            .bind(&details.name)
            .bind(details.price)
            .bind(details.currency.code())
            .bind(details.image_url.as_deref())
            .bind(details.category.as_deref())
            .bind(details.is_crate)
            .bind(details.is_free)
            .bind(Json(&details.contents))
            .bind(Json(&details.loot_table))
            .bind(&details.servers)
            .bind(details.discount.map(|d| i16::from(d.percent)))
            .bind(
                details
                    .discount
                    .and_then(|d| d.ends_at)
                    .map(SqlxTimestamp::from),
            )
            .bind(details.event_bonus)
            .bind(cooldown_hours)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        details: &ProductDetails,
    ) -> Result<ProductRecord, sqlx::Error> {
        let cooldown_hours = cooldown_to_sql(details.cooldown_hours)?;

        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(&details.name)
            .bind(details.price)
            .bind(details.currency.code())
            .bind(details.image_url.as_deref())
            .bind(details.category.as_deref())
            .bind(details.is_crate)
            .bind(details.is_free)
            .bind(Json(&details.contents))
            .bind(Json(&details.loot_table))
            .bind(&details.servers)
            .bind(details.discount.map(|d| i16::from(d.percent)))
            .bind(
                details
                    .discount
                    .and_then(|d| d.ends_at)
                    .map(SqlxTimestamp::from),
            )
            .bind(details.event_bonus)
            .bind(cooldown_hours)
            .fetch_one(&mut **tx)
            .await
    }

    /// Soft-deletes a product. Returns the number of rows affected.
    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}

fn cooldown_to_sql(cooldown_hours: Option<u32>) -> Result<Option<i32>, sqlx::Error> {
    cooldown_hours
        .map(i32::try_from)
        .transpose()
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let currency = row
            .try_get::<String, _>("currency")?
            .parse::<Currency>()
            .map_err(|e| decode_error("currency", e))?;

        let discount_percent = row
            .try_get::<Option<i16>, _>("discount_percent")?
            .map(u8::try_from)
            .transpose()
            .map_err(|e| decode_error("discount_percent", e))?;

        let discount_ends_at = row
            .try_get::<Option<SqlxTimestamp>, _>("discount_ends_at")?
            .map(SqlxTimestamp::to_jiff);

        let discount = discount_percent
            .map(|percent| Discount::new(percent, discount_ends_at))
            .transpose()
            .map_err(|e| decode_error("discount_percent", e))?;

        let cooldown_hours = row
            .try_get::<Option<i32>, _>("cooldown_hours")?
            .map(u32::try_from)
            .transpose()
            .map_err(|e| decode_error("cooldown_hours", e))?;

        let Json(contents) = row.try_get::<Json<Vec<Reward>>, _>("contents")?;
        let Json(loot_table) = row.try_get::<Json<Vec<LootEntry>>, _>("loot_table")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            currency,
            image_url: row.try_get("image_url")?,
            category: row.try_get("category")?,
            is_crate: row.try_get("is_crate")?,
            is_free: row.try_get("is_free")?,
            contents,
            loot_table,
            servers: row.try_get("servers")?,
            discount,
            event_bonus: row.try_get("event_bonus")?,
            cooldown_hours,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
