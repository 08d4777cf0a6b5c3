//! Deliveries Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use ostrum::rewards::GrantedItem;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    accounts::records::UserUuid,
    deliveries::records::{DeliveryStatus, PendingItemRecord, PendingItemUuid},
};

const CREATE_PENDING_ITEMS_SQL: &str = include_str!("sql/create_pending_items.sql");
const LIST_PENDING_ITEMS_SQL: &str = include_str!("sql/list_pending_items.sql");
const CLAIM_PENDING_ITEMS_SQL: &str = include_str!("sql/claim_pending_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDeliveriesRepository;

impl PgDeliveriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Queue one pending row per granted item.
    pub(crate) async fn create_pending_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        server: &str,
        items: &[GrantedItem],
    ) -> Result<Vec<PendingItemRecord>, sqlx::Error> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = items
            .iter()
            .map(|_| PendingItemUuid::new().into_uuid())
            .collect();
        let codes: Vec<&str> = items.iter().map(|i| i.item_code.as_str()).collect();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        let icons: Vec<&str> = items.iter().map(|i| i.icon_url.as_str()).collect();
        let quantities = items
            .iter()
            .map(|i| i32::try_from(i.quantity))
            .collect::<Result<Vec<i32>, _>>()
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, PendingItemRecord>(CREATE_PENDING_ITEMS_SQL)
            .bind(uuids)
            .bind(user.into_uuid())
            .bind(server)
            .bind(codes)
            .bind(names)
            .bind(icons)
            .bind(quantities)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        server: Option<&str>,
    ) -> Result<Vec<PendingItemRecord>, sqlx::Error> {
        query_as::<Postgres, PendingItemRecord>(LIST_PENDING_ITEMS_SQL)
            .bind(user.into_uuid())
            .bind(server)
            .fetch_all(&mut **tx)
            .await
    }

    /// Flip every pending row for `user` on `server` to delivered and return them.
    pub(crate) async fn claim_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        server: &str,
    ) -> Result<Vec<PendingItemRecord>, sqlx::Error> {
        query_as::<Postgres, PendingItemRecord>(CLAIM_PENDING_ITEMS_SQL)
            .bind(user.into_uuid())
            .bind(server)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PendingItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<DeliveryStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        let quantity = u32::try_from(row.try_get::<i32, _>("quantity")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            uuid: PendingItemUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            item_code: row.try_get("item_code")?,
            name: row.try_get("name")?,
            icon_url: row.try_get("icon_url")?,
            quantity,
            server_id: row.try_get("server_id")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
