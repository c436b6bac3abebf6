//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;
use tracing::error;

use storefront_app::{auth::Identity, domain::users::records::UserUuid};

use crate::errors::ApiError;

const IDENTITY_DEPOT_KEY: &str = "storefront.identity";

/// Typed access to request-scoped values.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_identity(&mut self, identity: Identity);

    fn identity(&self) -> Option<Identity>;

    /// The authenticated user, or 401 when the gateway admitted no identity.
    fn user_or_401(&self) -> Result<UserUuid, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>().map_err(|_missing| {
            error!("request state missing from depot");

            ApiError::internal()
        })
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.insert(IDENTITY_DEPOT_KEY, identity);
    }

    fn identity(&self) -> Option<Identity> {
        self.get::<Identity>(IDENTITY_DEPOT_KEY).ok().copied()
    }

    fn user_or_401(&self) -> Result<UserUuid, ApiError> {
        self.identity()
            .map(|identity| identity.user)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
