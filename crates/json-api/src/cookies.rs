//! Auth cookie writer.
//!
//! After every identity transition the response carries either the access and
//! refresh cookies or the session cookie, never both. The writer removes the
//! other kind explicitly so a stale cookie cannot survive in the browser.

use jiff::SignedDuration;
use salvo::{
    http::cookie::{Cookie, SameSite, time::Duration},
    prelude::Response,
};

use elysian_app::auth::{Session, TokenPair};

/// Cookie names, attributes and lifetimes.
#[derive(Debug, Clone)]
pub(crate) struct CookieSettings {
    pub(crate) access_name: String,
    pub(crate) refresh_name: String,
    pub(crate) session_name: String,
    pub(crate) secure: bool,
    pub(crate) http_only: bool,
    pub(crate) same_site: SameSite,
    pub(crate) path: String,
    pub(crate) access_max_age: SignedDuration,
    pub(crate) refresh_max_age: SignedDuration,
    pub(crate) session_max_age: SignedDuration,
}

impl CookieSettings {
    /// Anonymous -> authenticated: token cookies in, session cookie out.
    pub(crate) fn set_tokens(&self, res: &mut Response, tokens: &TokenPair) {
        res.add_cookie(self.cookie(
            &self.access_name,
            tokens.access_token.clone(),
            self.access_max_age,
        ));
        res.add_cookie(self.cookie(
            &self.refresh_name,
            tokens.refresh_token.clone(),
            self.refresh_max_age,
        ));
        res.add_cookie(self.removal(&self.session_name));
    }

    /// Renew only the access cookie; everything else is left alone.
    pub(crate) fn set_access(&self, res: &mut Response, access_token: &str) {
        res.add_cookie(self.cookie(
            &self.access_name,
            access_token.to_owned(),
            self.access_max_age,
        ));
    }

    /// Authenticated -> anonymous: session cookie in, token cookies out.
    pub(crate) fn set_session(&self, res: &mut Response, session: &Session) {
        self.clear_tokens(res);

        res.add_cookie(self.cookie(
            &self.session_name,
            session.id.to_string(),
            self.session_max_age,
        ));
    }

    pub(crate) fn clear_tokens(&self, res: &mut Response) {
        res.add_cookie(self.removal(&self.access_name));
        res.add_cookie(self.removal(&self.refresh_name));
    }

    fn cookie(&self, name: &str, value: String, max_age: SignedDuration) -> Cookie<'static> {
        Cookie::build((name.to_owned(), value))
            .path(self.path.clone())
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(Duration::seconds(max_age.as_secs()))
            .build()
    }

    fn removal(&self, name: &str) -> Cookie<'static> {
        let mut cookie = self.cookie(name, String::new(), SignedDuration::ZERO);

        cookie.make_removal();

        cookie
    }
}
