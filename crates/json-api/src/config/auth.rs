//! Auth Config

use clap::Args;
use jiff::SignedDuration;

use elysian_app::auth::TokenSettings;

/// Token signing and lifetime settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// HMAC secret used to sign access and refresh tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Issuer embedded in, and required of, every token
    #[arg(long, env = "JWT_ISSUER", default_value = "elysian")]
    pub jwt_issuer: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "ACCESS_TOKEN_EXPIRY", default_value_t = 3_600)]
    pub access_token_expiry_secs: i64,

    /// Refresh token lifetime in seconds
    #[arg(long, env = "REFRESH_TOKEN_EXPIRY", default_value_t = 604_800)]
    pub refresh_token_expiry_secs: i64,

    /// Anonymous session lifetime in seconds
    #[arg(long, env = "SESSION_EXPIRY", default_value_t = 1_209_600)]
    pub session_expiry_secs: i64,
}

impl AuthConfig {
    pub(crate) fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            secret: self.jwt_secret.clone(),
            issuer: self.jwt_issuer.clone(),
            access_ttl: SignedDuration::from_secs(self.access_token_expiry_secs),
            refresh_ttl: SignedDuration::from_secs(self.refresh_token_expiry_secs),
        }
    }

    pub(crate) fn session_ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(self.session_expiry_secs)
    }
}
