//! Cookie Config

use clap::{Args, ValueEnum};
use jiff::SignedDuration;
use salvo::http::cookie::SameSite;

use crate::cookies::CookieSettings;

/// `SameSite` attribute for auth cookies.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CookieSameSite {
    /// Sent on same-site requests only.
    Strict,

    /// Also sent on top-level cross-site navigations.
    Lax,

    /// Sent everywhere; browsers require `Secure` alongside it.
    None,
}

impl From<CookieSameSite> for SameSite {
    fn from(value: CookieSameSite) -> Self {
        match value {
            CookieSameSite::Strict => Self::Strict,
            CookieSameSite::Lax => Self::Lax,
            CookieSameSite::None => Self::None,
        }
    }
}

/// Auth cookie names and attributes.
#[derive(Debug, Args)]
pub struct CookieConfig {
    /// Access token cookie name
    #[arg(long, env = "ACCESS_TOKEN_COOKIE", default_value = "access_token")]
    pub access_cookie_name: String,

    /// Refresh token cookie name
    #[arg(long, env = "REFRESH_TOKEN_COOKIE", default_value = "refresh_token")]
    pub refresh_cookie_name: String,

    /// Anonymous session cookie name
    #[arg(long, env = "SESSION_COOKIE", default_value = "session_id")]
    pub session_cookie_name: String,

    /// Mark cookies `Secure`
    #[arg(long, env = "COOKIE_SECURE", default_value_t = false)]
    pub cookie_secure: bool,

    /// Mark cookies `HttpOnly`
    #[arg(long, env = "COOKIE_HTTPONLY", default_value_t = true)]
    pub cookie_httponly: bool,

    /// `SameSite` attribute
    #[arg(long, env = "COOKIE_SAMESITE", value_enum, default_value_t = CookieSameSite::Lax)]
    pub cookie_samesite: CookieSameSite,

    /// Cookie path
    #[arg(long, env = "COOKIE_PATH", default_value = "/")]
    pub cookie_path: String,
}

impl CookieConfig {
    /// Cookie max-ages follow the lifetimes of what they carry.
    pub(crate) fn settings(
        &self,
        access_max_age: SignedDuration,
        refresh_max_age: SignedDuration,
        session_max_age: SignedDuration,
    ) -> CookieSettings {
        CookieSettings {
            access_name: self.access_cookie_name.clone(),
            refresh_name: self.refresh_cookie_name.clone(),
            session_name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: self.cookie_httponly,
            same_site: self.cookie_samesite.into(),
            path: self.cookie_path.clone(),
            access_max_age,
            refresh_max_age,
            session_max_age,
        }
    }
}
