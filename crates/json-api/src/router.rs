//! App Router

use salvo::Router;

use crate::{addresses, auth, carts, catalog, orders};

/// Every API route, grouped by the identity contract it runs under.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("session").get(auth::handlers::session::handler))
        .push(
            Router::with_path("user")
                .push(Router::with_path("register").post(auth::handlers::register::handler))
                .push(Router::with_path("login").post(auth::handlers::login::handler))
                .push(Router::with_path("logout").post(auth::handlers::logout::handler))
                .push(
                    Router::with_path("refresh")
                        .hoop(auth::middleware::refresh_only)
                        .post(auth::handlers::refresh::handler),
                ),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::dual_mode)
                .push(
                    Router::with_path("cart")
                        .get(carts::get::handler)
                        .post(carts::upsert::handler),
                )
                .push(Router::with_path("categories").get(catalog::categories::handler))
                .push(
                    Router::with_path("products/{product}/variants")
                        .get(catalog::index::handler)
                        .push(
                            Router::with_path("{variant}/pricing")
                                .get(catalog::pricing::handler),
                        ),
                ),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::token_only)
                .push(
                    Router::with_path("user/me")
                        .get(auth::handlers::me::show)
                        .patch(auth::handlers::me::update),
                )
                .push(
                    Router::with_path("user/addresses")
                        .get(addresses::index::handler)
                        .post(addresses::create::handler)
                        .push(
                            Router::with_path("{address}")
                                .patch(addresses::update::handler)
                                .delete(addresses::delete::handler),
                        ),
                )
                .push(
                    Router::with_path("orders")
                        .get(orders::index::handler)
                        .push(Router::with_path("checkout").post(orders::checkout::handler))
                        .push(Router::with_path("{order}").get(orders::get::handler)),
                )
                .push(
                    Router::with_path("admin")
                        .hoop(auth::middleware::staff_only)
                        .push(Router::with_path("variants/{variant}").get(catalog::get::handler)),
                ),
        )
}
