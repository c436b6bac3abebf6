//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront_app::{
    auth::{Identity, MockIdentityVerifier},
    context::AppContext,
    domain::{
        carts::MockCartsService,
        inventory::MockInventoryService,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        users::{MockUsersService, records::UserUuid},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Stand-in for the auth gateway: admits every request as [`TEST_USER`].
#[salvo::handler]
pub(crate) async fn inject_identity(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(Identity {
        user: TEST_USER,
        expires_at: Timestamp::MAX,
    });

    ctrl.call_next(req, depot, res).await;
}

/// Mocks for every service. Any call without an expectation fails the test.
#[derive(Debug, Default)]
pub(crate) struct MockApp {
    pub users: MockUsersService,
    pub products: MockProductsService,
    pub inventory: MockInventoryService,
    pub carts: MockCartsService,
    pub verifier: MockIdentityVerifier,
}

impl MockApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            users: Arc::new(self.users),
            products: Arc::new(self.products),
            inventory: Arc::new(self.inventory),
            carts: Arc::new(self.carts),
            verifier: Arc::new(self.verifier),
        })
    }
}

fn authenticated_service(app: MockApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_identity)
            .push(route),
    )
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    authenticated_service(
        MockApp {
            carts,
            ..MockApp::default()
        },
        route,
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    authenticated_service(
        MockApp {
            products,
            ..MockApp::default()
        },
        route,
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        price: 100,
        stock: 5,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
