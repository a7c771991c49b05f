//! Payment Gateway Config

use std::time::Duration;

use clap::Args;

use elysian_app::payments::HttpPaymentGatewayConfig;

/// Payment gateway credentials and endpoints.
#[derive(Debug, Args)]
pub struct GatewayConfig {
    /// Gateway API base URL
    #[arg(
        long,
        env = "GATEWAY_BASE_URL",
        default_value = "https://api-preprod.phonepe.com/apis/pg-sandbox"
    )]
    pub gateway_base_url: String,

    /// OAuth client id
    #[arg(long, env = "GATEWAY_CLIENT_ID")]
    pub gateway_client_id: String,

    /// OAuth client secret
    #[arg(long, env = "GATEWAY_CLIENT_SECRET", hide_env_values = true)]
    pub gateway_client_secret: String,

    /// OAuth client version
    #[arg(long, env = "GATEWAY_CLIENT_VERSION", default_value = "1")]
    pub gateway_client_version: String,

    /// Base URL the gateway redirects shoppers back to after paying
    #[arg(
        long,
        env = "PAYMENT_CALLBACK_BASE_URL",
        default_value = "http://localhost:3000/order/status"
    )]
    pub callback_base_url: String,

    /// Upper bound on every gateway call, in seconds
    #[arg(long, env = "GATEWAY_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub gateway_timeout_secs: u64,
}

impl GatewayConfig {
    pub(crate) fn client_config(&self) -> HttpPaymentGatewayConfig {
        HttpPaymentGatewayConfig {
            base_url: self.gateway_base_url.clone(),
            client_id: self.gateway_client_id.clone(),
            client_secret: self.gateway_client_secret.clone(),
            client_version: self.gateway_client_version.clone(),
        }
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }
}
