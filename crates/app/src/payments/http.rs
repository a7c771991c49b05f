//! HTTP client for a PhonePe-style standard checkout API.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tracing::debug;

use crate::payments::{
    errors::GatewayError,
    gateway::PaymentGateway,
    models::{GatewayOrderStatus, GatewayState, InitiatedPayment, PaymentAttempt, PaymentRequest},
};

/// Seconds before expiry at which a cached access token is refreshed.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Configuration for connecting to the payment gateway.
#[derive(Clone)]
pub struct HttpPaymentGatewayConfig {
    /// Gateway base URL, e.g. `"https://api-preprod.phonepe.com/apis/pg-sandbox"`.
    pub base_url: String,

    pub client_id: String,
    pub client_secret: String,
    pub client_version: String,
}

impl fmt::Debug for HttpPaymentGatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPaymentGatewayConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("client_version", &self.client_version)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

/// HTTP payment gateway client with a cached OAuth token.
#[derive(Debug)]
pub struct HttpPaymentGateway {
    config: HttpPaymentGatewayConfig,
    http: Client,
    token: RwLock<Option<CachedToken>>,
}

impl HttpPaymentGateway {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: HttpPaymentGatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
            token: RwLock::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn access_token(&self) -> Result<String, GatewayError> {
        let now = Timestamp::now().as_second();

        if let Some(token) = self.token.read().await.as_ref()
            && token.expires_at - TOKEN_REFRESH_MARGIN_SECS > now
        {
            return Ok(token.value.clone());
        }

        let mut cached = self.token.write().await;

        if let Some(token) = cached.as_ref()
            && token.expires_at - TOKEN_REFRESH_MARGIN_SECS > now
        {
            return Ok(token.value.clone());
        }

        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_version", self.config.client_version.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(self.url("/v1/oauth/token"))
            .form(&form)
            .send()
            .await?;

        let parsed: TokenResponse = parse_response(response, "token").await?;

        debug!(expires_at = parsed.expires_at, "payment gateway token refreshed");

        let value = parsed.access_token;

        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at: parsed.expires_at,
        });

        Ok(value)
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<InitiatedPayment, GatewayError> {
        let token = self.access_token().await?;

        let body = PayRequest {
            merchant_order_id: &request.gateway_order_id,
            amount: request.amount_minor,
            payment_flow: PaymentFlow {
                flow_type: "PG_CHECKOUT",
                merchant_urls: MerchantUrls {
                    redirect_url: &request.callback_url,
                },
            },
        };

        let response = self
            .http
            .post(self.url("/checkout/v2/pay"))
            .header("Authorization", format!("O-Bearer {token}"))
            .json(&body)
            .send()
            .await?;

        let parsed: PayResponse = parse_response(response, "pay").await?;

        Ok(InitiatedPayment {
            gateway_reference: parsed.order_id,
            state: parsed.state,
            redirect_url: parsed.redirect_url,
            expire_at: parsed.expire_at,
        })
    }

    async fn get_order_status(
        &self,
        gateway_order_id: &str,
    ) -> Result<GatewayOrderStatus, GatewayError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.url(&format!("/checkout/v2/order/{gateway_order_id}/status")))
            .query(&[("details", "false")])
            .header("Authorization", format!("O-Bearer {token}"))
            .send()
            .await?;

        let parsed: StatusResponse = parse_response(response, "order status").await?;

        let attempts = parsed
            .payment_details
            .into_iter()
            .map(|detail| PaymentAttempt {
                transaction_id: detail.transaction_id,
                payment_mode: detail.payment_mode,
                timestamp: detail.timestamp,
                error_code: detail.error_code,
                detailed_error_code: detail.detailed_error_code,
            })
            .collect();

        Ok(GatewayOrderStatus::new(parsed.state, attempts))
    }
}

async fn parse_response<T: DeserializeOwned>(
    response: Response,
    operation: &str,
) -> Result<T, GatewayError> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        return Err(GatewayError::UnexpectedResponse(format!(
            "{operation} request failed with status {status}: {text}"
        )));
    }

    Ok(response.json().await?)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayRequest<'a> {
    merchant_order_id: &'a str,
    amount: i64,
    payment_flow: PaymentFlow<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentFlow<'a> {
    #[serde(rename = "type")]
    flow_type: &'static str,
    merchant_urls: MerchantUrls<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MerchantUrls<'a> {
    redirect_url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayResponse {
    order_id: Option<String>,
    state: GatewayState,
    redirect_url: String,
    expire_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    state: GatewayState,

    #[serde(default)]
    payment_details: Vec<StatusPaymentDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusPaymentDetail {
    transaction_id: Option<String>,
    payment_mode: Option<String>,
    timestamp: Option<i64>,
    error_code: Option<String>,
    detailed_error_code: Option<String>,
}
