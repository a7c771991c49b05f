//! Access and refresh token issuing and validation.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{TokenPair, UserId};

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,

    /// Unique token id, used for refresh-token blacklisting.
    pub jti: Uuid,

    pub token_type: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    /// The user the token was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] when the subject is not a user id.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }

    /// Expiry as a timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] when `exp` is out of range.
    pub fn expires_at(&self) -> Result<Timestamp, TokenError> {
        Timestamp::from_second(self.exp).map_err(|_| TokenError::Invalid)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    Invalid,

    #[error("token is not a {0:?} token")]
    WrongKind(TokenKind),

    #[error("failed to encode token")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

/// Signing secret and lifetimes.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    pub access_ttl: SignedDuration,
    pub refresh_ttl: SignedDuration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"**redacted**")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// HS256 token issuer.
#[derive(Clone)]
pub struct TokenIssuer {
    issuer: String,
    access_ttl: SignedDuration,
    refresh_ttl: SignedDuration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new(settings: TokenSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer,
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
        }
    }

    /// Sign a single token of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(&self, user: UserId, kind: TokenKind) -> Result<(String, Claims), TokenError> {
        let now = Timestamp::now().as_second();

        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: user.to_string(),
            jti: Uuid::new_v4(),
            token_type: kind,
            iat: now,
            exp: now.saturating_add(ttl.as_secs()),
            iss: self.issuer.clone(),
        };

        let token =
            encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Encoding)?;

        Ok((token, claims))
    }

    /// Sign a fresh access + refresh pair.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_pair(&self, user: UserId) -> Result<TokenPair, TokenError> {
        let (access_token, _) = self.issue(user, TokenKind::Access)?;
        let (refresh_token, _) = self.issue(user, TokenKind::Refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate signature, issuer, expiry and kind.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing why the token was rejected.
    pub fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Invalid,
            })?
            .claims;

        if claims.token_type != expected {
            return Err(TokenError::WrongKind(expected));
        }

        Ok(claims)
    }
}
