//! Ledger Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use ostrum::currency::Currency;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use crate::domain::{
    accounts::records::UserUuid,
    ledger::{
        data::NewTransaction,
        records::{LedgerItem, TransactionKind, TransactionRecord, TransactionUuid},
    },
};

const CREATE_TRANSACTION_SQL: &str = include_str!("sql/create_transaction.sql");
const LIST_TRANSACTIONS_SQL: &str = include_str!("sql/list_transactions.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLedgerRepository;

impl PgLedgerRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transaction: &NewTransaction,
    ) -> Result<TransactionRecord, sqlx::Error> {
        query_as::<Postgres, TransactionRecord>(CREATE_TRANSACTION_SQL)
            .bind(TransactionUuid::new().into_uuid())
            .bind(transaction.user.into_uuid())
            .bind(transaction.amount)
            .bind(transaction.currency.code())
            .bind(transaction.server_id.as_deref())
            .bind(transaction.kind.as_str())
            .bind(Json(&transaction.items))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_transactions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<TransactionRecord>, sqlx::Error> {
        query_as::<Postgres, TransactionRecord>(LIST_TRANSACTIONS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TransactionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let currency = row
            .try_get::<String, _>("currency")?
            .parse::<Currency>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "currency".to_string(),
                source: Box::new(e),
            })?;

        let kind = row
            .try_get::<String, _>("kind")?
            .parse::<TransactionKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: Box::new(e),
            })?;

        let Json(items) = row.try_get::<Json<Vec<LedgerItem>>, _>("items")?;

        Ok(Self {
            uuid: TransactionUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            amount: row.try_get("amount")?,
            currency,
            server_id: row.try_get("server_id")?,
            kind,
            items,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
