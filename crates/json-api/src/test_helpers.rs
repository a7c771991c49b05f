//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use elysian_app::{
    auth::{Actor, MockAuthService, Principal, SessionId, UserId},
    context::AppContext,
    domain::{
        addresses::MockAddressesService, carts::MockCartsService, catalog::MockCatalogService,
        orders::MockOrdersService,
    },
};

use crate::{cookies, extensions::*, state::State};

pub(crate) const TEST_USER: Principal = Principal {
    user_id: UserId::from_i64(7),
    is_staff: false,
};

pub(crate) const TEST_STAFF: Principal = Principal {
    user_id: UserId::from_i64(1),
    is_staff: true,
};

pub(crate) fn test_session() -> SessionId {
    SessionId::from_uuid(uuid::Uuid::nil())
}

/// Service mocks; any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) auth: MockAuthService,
    pub(crate) catalog: MockCatalogService,
    pub(crate) carts: MockCartsService,
    pub(crate) addresses: MockAddressesService,
    pub(crate) orders: MockOrdersService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(
            AppContext {
                auth: Arc::new(self.auth),
                catalog: Arc::new(self.catalog),
                carts: Arc::new(self.carts),
                addresses: Arc::new(self.addresses),
                orders: Arc::new(self.orders),
            },
            cookies::tests::settings(),
        )
    }

    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(TEST_USER);
    depot.insert_actor(Actor::AuthenticatedUser(TEST_USER));
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_session(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_actor(Actor::AnonymousSession(test_session()));
    ctrl.call_next(req, depot, res).await;
}
