//! Redemption rules shared by storefront redemption and balance top-ups.

use sqlx::{Postgres, Transaction};

use crate::domain::{
    accounts::records::UserUuid,
    promocodes::{
        data::normalize_code, errors::PromoCodesServiceError, records::PromoCodeRecord,
        repository::PgPromoCodesRepository,
    },
};

/// Where a code is being entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RedemptionContext {
    Storefront,
    TopUp,
}

/// Look up `code` and check it may be used by `user` in `context`.
///
/// The code stays locked until the transaction ends, so the activation count cannot move
/// between this check and the increment.
pub(crate) async fn lock_redeemable(
    repository: &PgPromoCodesRepository,
    tx: &mut Transaction<'_, Postgres>,
    code: &str,
    user: UserUuid,
    context: RedemptionContext,
) -> Result<PromoCodeRecord, PromoCodesServiceError> {
    let promocode = repository
        .lock_promocode_by_code(tx, &normalize_code(code))
        .await?
        .ok_or(PromoCodesServiceError::NotFound)?;

    if promocode.is_exhausted() {
        return Err(PromoCodesServiceError::LimitExceeded);
    }

    if promocode.is_reserved_for_other(user) {
        return Err(PromoCodesServiceError::NotEligible);
    }

    if promocode.reward.is_topup_bonus() != (context == RedemptionContext::TopUp) {
        return Err(PromoCodesServiceError::WrongContext);
    }

    if repository.has_usage(tx, promocode.uuid, user).await? {
        return Err(PromoCodesServiceError::AlreadyUsed);
    }

    Ok(promocode)
}
