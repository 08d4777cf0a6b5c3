//! Transactions Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, models::TransactionResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TransactionsResponse {
    /// History, newest first
    pub transactions: Vec<TransactionResponse>,
}

/// Transactions Handler
#[endpoint(tags("me"), summary = "List Transactions", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<TransactionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let transactions = state
        .app
        .ledger
        .list_transactions(user.uuid)
        .await
        .or_500("failed to fetch transactions")?;

    Ok(Json(TransactionsResponse {
        transactions: transactions.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use ostrum_app::domain::ledger::records::TransactionKind;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        models::fixtures::make_transaction,
        test_helpers::{Mocks, TEST_USER_UUID},
    };

    use super::*;

    #[tokio::test]
    async fn test_lists_own_transactions() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .ledger
            .expect_list_transactions()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| {
                Ok(vec![
                    make_transaction(TransactionKind::Deposit, 500),
                    make_transaction(TransactionKind::Purchase, 100),
                ])
            });

        let response: TransactionsResponse = TestClient::get("http://example.com/me/transactions")
            .send(&mocks.service(Router::with_path("me/transactions").get(handler)))
            .await
            .take_json()
            .await?;

        let kinds: Vec<_> = response.transactions.iter().map(|t| t.kind.as_str()).collect();

        assert_eq!(kinds, vec!["DEPOSIT", "PURCHASE"]);

        Ok(())
    }
}
