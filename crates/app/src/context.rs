//! App Context

use std::{sync::Arc, time::Duration};

use jiff::SignedDuration;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, TokenIssuer, TokenSettings},
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        orders::{CheckoutSettings, OrdersService, PgOrdersService},
    },
    payments::{HttpPaymentGateway, HttpPaymentGatewayConfig},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Everything needed to build the application services.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub run_migrations: bool,
    pub tokens: TokenSettings,
    pub session_ttl: SignedDuration,
    pub gateway: HttpPaymentGatewayConfig,
    pub callback_base_url: String,
    pub gateway_timeout: Duration,
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub addresses: Arc<dyn AddressesService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Connect to the database and build the PostgreSQL-backed services.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_settings(settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect(&settings.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if settings.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let db = Db::new(pool.clone());

        let gateway = Arc::new(HttpPaymentGateway::new(settings.gateway));

        Ok(Self {
            auth: Arc::new(PgAuthService::new(
                pool,
                TokenIssuer::new(settings.tokens),
                settings.session_ttl,
            )),
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(
                db,
                gateway,
                CheckoutSettings {
                    callback_base_url: settings.callback_base_url,
                    gateway_timeout: settings.gateway_timeout,
                },
            )),
        })
    }
}
