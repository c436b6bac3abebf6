//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{IdentityVerifier, JwtSettings, JwtVerifier},
    database::{self, Db, PoolSettings},
    domain::{
        carts::{CartsService, PgCartsService},
        inventory::{InventoryService, PgInventoryService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("JWT secret must not be empty")]
    EmptyJwtSecret,
}

/// Services shared by every request.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub products: Arc<dyn ProductsService>,
    pub inventory: Arc<dyn InventoryService>,
    pub carts: Arc<dyn CartsService>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppContext {
    /// Build application context from a database URL and token settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the JWT secret is blank or establishing a database
    /// connection fails.
    pub async fn from_settings(
        database_url: &str,
        pool: PoolSettings,
        jwt: &JwtSettings,
    ) -> Result<Self, AppInitError> {
        if jwt.secret.trim().is_empty() {
            return Err(AppInitError::EmptyJwtSecret);
        }

        let pool = database::connect_with(database_url, pool)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(Db::new(pool), jwt))
    }

    /// Build application context around an existing database handle.
    #[must_use]
    pub fn from_db(db: Db, jwt: &JwtSettings) -> Self {
        Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            inventory: Arc::new(PgInventoryService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db)),
            verifier: Arc::new(JwtVerifier::new(jwt)),
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
