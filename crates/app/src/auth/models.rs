//! Auth data models.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use jiff::Timestamp;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::ids::TypedId;

/// User Id
pub type UserId = TypedId<User>;

/// A registered customer or staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub mobile_number: String,
    pub alternate_mobile_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Registration payload.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub mobile_number: String,
    pub alternate_mobile_number: Option<String>,
    pub password: Password,
    pub password_confirm: Password,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub alternate_mobile_number: Option<String>,
}

/// User row together with its password hash, used during login.
#[derive(Debug, Clone)]
pub(crate) struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Plain-text password, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Anonymous session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0.simple(), f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(value).map(Self)
    }
}

/// Server-side record backing an anonymous session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub is_staff: bool,
}

/// The identity a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    AuthenticatedUser(Principal),
    AnonymousSession(SessionId),
}

/// Raw credential material read off a request.
///
/// The HTTP layer builds this once per request; nothing downstream writes back
/// into the request's headers or cookies.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PresentedCredentials {
    pub bearer_token: Option<String>,
    pub access_cookie: Option<String>,
    pub refresh_cookie: Option<String>,
    pub session_cookie: Option<String>,
}

impl PresentedCredentials {
    /// Access tokens in the order they are tried: header, then cookie.
    pub(crate) fn access_token_candidates(&self) -> impl Iterator<Item = &str> {
        self.bearer_token
            .iter()
            .chain(self.access_cookie.iter())
            .map(String::as_str)
            .filter(|token| !token.is_empty())
    }

    pub(crate) fn session_id(&self) -> Option<SessionId> {
        self.session_cookie
            .as_deref()
            .and_then(|value| value.parse().ok())
    }

    pub(crate) fn refresh_token(&self) -> Option<&str> {
        self.refresh_cookie
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

impl fmt::Debug for PresentedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentedCredentials")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "**"))
            .field("access_cookie", &self.access_cookie.as_ref().map(|_| "**"))
            .field("refresh_cookie", &self.refresh_cookie.as_ref().map(|_| "**"))
            .field("session_cookie", &self.session_cookie)
            .finish()
    }
}

/// Freshly issued access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Result of a logout: the replacement anonymous session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub session: Session,
    pub refresh_revoked: bool,
}

/// What the session bootstrap endpoint decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBootstrap {
    /// A valid refresh token was presented; only the access token is renewed.
    AccessRefreshed { access_token: String },

    /// The caller is anonymous and now holds `session`.
    SessionCreated { session: Session, reused: bool },
}
