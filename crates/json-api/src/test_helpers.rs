//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use ostrum_app::{
    context::AppContext,
    domain::{
        accounts::{
            MockAccountsService,
            records::{Role, UserRecord, UserUuid},
        },
        catalog::MockCatalogService,
        deliveries::MockDeliveriesService,
        ledger::MockLedgerService,
        notifications::MockNotificationsService,
        promocodes::MockPromoCodesService,
        store::MockStoreService,
        topups::MockTopUpsService,
    },
};
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) fn make_user(nickname: &str, role: Role) -> UserRecord {
    UserRecord {
        uuid: TEST_USER_UUID,
        steam_id: format!("steam_{nickname}"),
        nickname: nickname.to_string(),
        avatar_url: None,
        role,
        balance: Decimal::from(100),
        event_balance: Decimal::ZERO,
        referral_code: "OSTRUM42".to_string(),
        referred_by: None,
        total_referral_earnings: Decimal::ZERO,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

struct InjectUser(UserRecord);

#[handler]
impl InjectUser {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_user(self.0.clone());
        ctrl.call_next(req, depot, res).await;
    }
}

/// Service mocks; any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) accounts: MockAccountsService,
    pub(crate) catalog: MockCatalogService,
    pub(crate) store: MockStoreService,
    pub(crate) promocodes: MockPromoCodesService,
    pub(crate) topups: MockTopUpsService,
    pub(crate) deliveries: MockDeliveriesService,
    pub(crate) ledger: MockLedgerService,
    pub(crate) notifications: MockNotificationsService,
}

impl Mocks {
    fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            accounts: Arc::new(self.accounts),
            catalog: Arc::new(self.catalog),
            store: Arc::new(self.store),
            promocodes: Arc::new(self.promocodes),
            topups: Arc::new(self.topups),
            deliveries: Arc::new(self.deliveries),
            ledger: Arc::new(self.ledger),
            notifications: Arc::new(self.notifications),
        })
    }

    /// Serve `route` with no authenticated user.
    pub(crate) fn service_without_user(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }

    /// Serve `route` as if `user` had presented a valid token.
    pub(crate) fn service_as(self, user: UserRecord, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(InjectUser(user))
                .push(route),
        )
    }

    /// Serve `route` as a regular player.
    pub(crate) fn service(self, route: Router) -> Service {
        self.service_as(make_user("player", Role::User), route)
    }

    /// Serve `route` as an administrator.
    pub(crate) fn admin_service(self, route: Router) -> Service {
        self.service_as(make_user("admin", Role::Admin), route)
    }
}
