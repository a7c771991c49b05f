//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use elysian_app::auth::{Actor, Principal};

const REFRESH_TOKEN_DEPOT_KEY: &str = "refresh_token";

/// Typed access to what the auth middlewares leave in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_actor(&mut self, actor: Actor);

    fn actor_or_401(&self) -> Result<Actor, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    fn principal_or_401(&self) -> Result<Principal, StatusError>;

    fn insert_refresh_token(&mut self, token: String);

    fn refresh_token_or_401(&self) -> Result<&str, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_actor(&mut self, actor: Actor) {
        self.inject(actor);
    }

    fn actor_or_401(&self) -> Result<Actor, StatusError> {
        self.obtain::<Actor>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<Principal, StatusError> {
        self.obtain::<Principal>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }

    fn insert_refresh_token(&mut self, token: String) {
        self.insert(REFRESH_TOKEN_DEPOT_KEY, token);
    }

    fn refresh_token_or_401(&self) -> Result<&str, StatusError> {
        self.get::<String>(REFRESH_TOKEN_DEPOT_KEY)
            .map(String::as_str)
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }
}
