//! Servers Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::catalog::{data::NewServer, records::ServerRecord};

const LIST_SERVERS_SQL: &str = include_str!("../sql/list_servers.sql");
const UPSERT_SERVER_SQL: &str = include_str!("../sql/upsert_server.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgServersRepository;

impl PgServersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_servers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ServerRecord>, sqlx::Error> {
        query_as::<Postgres, ServerRecord>(LIST_SERVERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_server(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        server: &NewServer,
    ) -> Result<ServerRecord, sqlx::Error> {
        query_as::<Postgres, ServerRecord>(UPSERT_SERVER_SQL)
            .bind(&server.identifier)
            .bind(&server.name)
            .bind(&server.ip)
            .bind(i32::from(server.port))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ServerRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let port = u16::try_from(row.try_get::<i32, _>("port")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "port".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            identifier: row.try_get("identifier")?,
            name: row.try_get("name")?,
            ip: row.try_get("ip")?,
            port,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
