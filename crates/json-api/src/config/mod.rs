//! Server configuration module

use clap::Parser;

use elysian_app::context::AppSettings;

use crate::{
    config::{
        auth::AuthConfig,
        cookies::CookieConfig,
        db::DatabaseConfig,
        gateway::GatewayConfig,
        observability::{LoggingConfig, ObservabilityConfig},
        server::ServerRuntimeConfig,
    },
    cookies::CookieSettings,
};

pub(crate) mod auth;
pub(crate) mod cookies;
pub(crate) mod db;
pub(crate) mod gateway;
pub(crate) mod observability;
pub(crate) mod server;

/// Elysian JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "elysian-json", about = "Elysian JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Token and session lifetimes.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Auth cookie names and flags.
    #[command(flatten)]
    pub cookies: CookieConfig,

    /// Payment gateway settings.
    #[command(flatten)]
    pub gateway: GatewayConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for building the application services.
    pub(crate) fn app_settings(&self) -> AppSettings {
        AppSettings {
            database_url: self.database.database_url.clone(),
            run_migrations: self.database.run_migrations,
            tokens: self.auth.token_settings(),
            session_ttl: self.auth.session_ttl(),
            gateway: self.gateway.client_config(),
            callback_base_url: self.gateway.callback_base_url.clone(),
            gateway_timeout: self.gateway.timeout(),
        }
    }

    /// Cookie lifetimes match the token and session lifetimes.
    pub(crate) fn cookie_settings(&self) -> CookieSettings {
        let tokens = self.auth.token_settings();

        self.cookies
            .settings(tokens.access_ttl, tokens.refresh_ttl, self.auth.session_ttl())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::observability::LogFormat;

    use super::*;

    #[test]
    fn minimal_arguments_fill_in_defaults() -> Result<(), clap::Error> {
        let config = ServerConfig::try_parse_from([
            "elysian-json",
            "--database-url",
            "postgres://localhost/elysian",
            "--jwt-secret",
            "dev-secret",
            "--gateway-client-id",
            "client",
            "--gateway-client-secret",
            "secret",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8000");
        assert_eq!(config.server.shutdown_grace().as_secs(), 30);
        assert_eq!(config.logging.log_format, LogFormat::Compact);
        assert!(!config.observability.otel_enabled, "OTLP export should be opt-in");
        assert_eq!(config.auth.access_token_expiry_secs, 3_600);
        assert_eq!(config.auth.refresh_token_expiry_secs, 604_800);
        assert_eq!(config.auth.session_expiry_secs, 1_209_600);
        assert_eq!(config.cookies.session_cookie_name, "session_id");
        assert!(config.cookies.cookie_httponly, "cookies should default to HttpOnly");
        assert!(!config.cookies.cookie_secure, "cookies should default to insecure");
        assert_eq!(config.gateway.gateway_timeout_secs, 10);
        assert_eq!(
            config.cookie_settings().refresh_max_age,
            jiff::SignedDuration::from_secs(604_800)
        );

        Ok(())
    }

    #[test]
    fn missing_jwt_secret_is_an_error() {
        let result = ServerConfig::try_parse_from([
            "elysian-json",
            "--database-url",
            "postgres://localhost/elysian",
            "--gateway-client-id",
            "client",
            "--gateway-client-secret",
            "secret",
        ]);

        assert!(result.is_err(), "expected parse error, got {result:?}");
    }
}
