//! Ledger service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        accounts::records::UserUuid,
        ledger::{
            errors::LedgerServiceError, records::TransactionRecord, repository::PgLedgerRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgLedgerService {
    db: Db,
    repository: PgLedgerRepository,
}

impl PgLedgerService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLedgerRepository::new(),
        }
    }
}

#[async_trait]
impl LedgerService for PgLedgerService {
    async fn list_transactions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<TransactionRecord>, LedgerServiceError> {
        let mut tx = self.db.begin().await?;

        let transactions = self.repository.list_transactions(&mut tx, user).await?;

        tx.commit().await?;

        Ok(transactions)
    }
}

#[automock]
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Lists a user's transactions, newest first.
    async fn list_transactions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<TransactionRecord>, LedgerServiceError>;
}
