//! Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::catalog::{data::NewItem, records::ItemRecord};

const LIST_ITEMS_SQL: &str = include_str!("../sql/list_items.sql");
const GET_ITEMS_BY_CODES_SQL: &str = include_str!("../sql/get_items_by_codes.sql");
const UPSERT_ITEM_SQL: &str = include_str!("../sql/upsert_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgItemsRepository;

impl PgItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ItemRecord>, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(LIST_ITEMS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch catalog entries for the given codes; unknown codes are simply absent.
    pub(crate) async fn get_items_by_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        codes: &[String],
    ) -> Result<Vec<ItemRecord>, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(GET_ITEMS_BY_CODES_SQL)
            .bind(codes)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &NewItem,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(UPSERT_ITEM_SQL)
            .bind(&item.code)
            .bind(&item.name)
            .bind(&item.icon_url)
            .bind(item.category.as_deref())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            icon_url: row.try_get("icon_url")?,
            category: row.try_get("category")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
