//! Identity middlewares.
//!
//! Each route group picks one contract: `dual_mode` accepts an access token or
//! a live anonymous session, `token_only` accepts an access token only and
//! `refresh_only` accepts a refresh token only. `staff_only` runs after
//! `token_only`.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};

use elysian_app::auth::PresentedCredentials;

use crate::{auth::into_status_error, cookies::CookieSettings, extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn dual_mode(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Ok(state) = depot.obtain::<Arc<State>>().cloned() else {
        res.render(StatusError::internal_server_error());

        return;
    };

    let credentials = presented_credentials(req, &state.cookies);

    match state.app.auth.authenticate_dual(&credentials).await {
        Ok(actor) => depot.insert_actor(actor),
        Err(error) => {
            res.render(into_status_error(error));

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn token_only(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Ok(state) = depot.obtain::<Arc<State>>().cloned() else {
        res.render(StatusError::internal_server_error());

        return;
    };

    let credentials = presented_credentials(req, &state.cookies);

    match state.app.auth.authenticate_token(&credentials).await {
        Ok(principal) => depot.insert_principal(principal),
        Err(error) => {
            res.render(into_status_error(error));

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn refresh_only(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Ok(state) = depot.obtain::<Arc<State>>().cloned() else {
        res.render(StatusError::internal_server_error());

        return;
    };

    let Some(token) = presented_credentials(req, &state.cookies)
        .refresh_cookie
        .filter(|token| !token.is_empty())
    else {
        res.render(StatusError::unauthorized().brief("Refresh token required"));

        return;
    };

    match state.app.auth.authenticate_refresh(&token).await {
        Ok(principal) => {
            depot.insert_principal(principal);
            depot.insert_refresh_token(token);
        }
        Err(error) => {
            res.render(into_status_error(error));

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn staff_only(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let principal = match depot.principal_or_401() {
        Ok(principal) => principal,
        Err(error) => {
            res.render(error);

            return;
        }
    };

    if let Err(error) = principal.require_staff() {
        res.render(into_status_error(error));

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

/// Snapshot every credential the request carries. The request is not modified.
pub(crate) fn presented_credentials(req: &Request, cookies: &CookieSettings) -> PresentedCredentials {
    let cookie = |name: &str| req.cookie(name).map(|cookie| cookie.value().to_owned());

    PresentedCredentials {
        bearer_token: extract_bearer_token(req).map(str::to_owned),
        access_cookie: cookie(&cookies.access_name),
        refresh_cookie: cookie(&cookies.refresh_name),
        session_cookie: cookie(&cookies.session_name),
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use elysian_app::auth::{Actor, AuthServiceError, MockAuthService};
    use salvo::{
        http::{HeaderValue, header::COOKIE},
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_STAFF, TEST_USER, test_session};

    use super::*;

    #[salvo::handler]
    async fn echo_actor(depot: &mut Depot, res: &mut Response) {
        let actor = match depot.actor_or_401() {
            Ok(Actor::AuthenticatedUser(principal)) => format!("user:{}", principal.user_id),
            Ok(Actor::AnonymousSession(session)) => format!("session:{session}"),
            Err(_) => "missing".to_string(),
        };

        res.render(actor);
    }

    #[salvo::handler]
    async fn echo_principal(depot: &mut Depot, res: &mut Response) {
        let principal = depot
            .principal_or_401()
            .map_or_else(|_| "missing".to_string(), |p| p.user_id.to_string());

        res.render(principal);
    }

    #[salvo::handler]
    async fn echo_authorization(req: &mut Request, res: &mut Response) {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("none")
            .to_owned();

        res.render(header);
    }

    fn dual_service(auth: MockAuthService) -> Service {
        Mocks {
            auth,
            ..Mocks::default()
        }
        .service(
            Router::new()
                .hoop(dual_mode)
                .push(Router::new().get(echo_actor))
                .push(Router::with_path("header").get(echo_authorization)),
        )
    }

    fn token_service(auth: MockAuthService) -> Service {
        Mocks {
            auth,
            ..Mocks::default()
        }
        .service(
            Router::new()
                .hoop(token_only)
                .push(Router::new().get(echo_principal))
                .push(
                    Router::with_path("admin")
                        .hoop(staff_only)
                        .get(echo_principal),
                ),
        )
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let mut req = Request::new();
        req.headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("bEaReR abc"));

        assert_eq!(extract_bearer_token(&req), Some("abc"));
    }

    #[tokio::test]
    async fn dual_mode_without_credentials_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_dual()
            .once()
            .withf(|credentials| *credentials == PresentedCredentials::default())
            .return_once(|_| Err(AuthServiceError::AuthenticationRequired));

        let res = TestClient::get("http://example.com")
            .send(&dual_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn dual_mode_reads_session_cookie() -> TestResult {
        let session = test_session();
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_dual()
            .once()
            .withf(move |credentials| {
                credentials.session_cookie.as_deref() == Some(session.to_string().as_str())
            })
            .return_once(move |_| Ok(Actor::AnonymousSession(session)));

        let mut res = TestClient::get("http://example.com")
            .add_header(COOKIE, format!("session_id={session}"), true)
            .send(&dual_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, format!("session:{session}"));

        Ok(())
    }

    #[tokio::test]
    async fn dual_mode_leaves_authorization_header_intact() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_dual()
            .once()
            .withf(|credentials| {
                credentials.bearer_token.as_deref() == Some("stale")
                    && credentials.access_cookie.as_deref() == Some("fresh")
            })
            .return_once(|_| Ok(Actor::AuthenticatedUser(TEST_USER)));

        let mut res = TestClient::get("http://example.com/header")
            .add_header(AUTHORIZATION, "Bearer stale", true)
            .add_header(COOKIE, "access_token=fresh", true)
            .send(&dual_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "Bearer stale");

        Ok(())
    }

    #[tokio::test]
    async fn token_only_injects_principal() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_token()
            .once()
            .withf(|credentials| credentials.bearer_token.as_deref() == Some("abc123"))
            .return_once(|_| Ok(TEST_USER));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&token_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, TEST_USER.user_id.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn token_only_rejects_session_holders() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_token()
            .once()
            .return_once(|_| Err(AuthServiceError::AuthenticationRequired));

        let res = TestClient::get("http://example.com")
            .add_header(COOKIE, format!("session_id={}", test_session()), true)
            .send(&token_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn staff_only_forbids_customers() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_token()
            .once()
            .return_once(|_| Ok(TEST_USER));

        let res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&token_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn staff_only_admits_staff() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_token()
            .once()
            .return_once(|_| Ok(TEST_STAFF));

        let res = TestClient::get("http://example.com/admin")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&token_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn refresh_only_requires_refresh_cookie() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_refresh().never();

        let service = Mocks {
            auth,
            ..Mocks::default()
        }
        .service(Router::new().hoop(refresh_only).get(echo_principal));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer access-only", true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }
}
