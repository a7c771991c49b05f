//! Payment gateway seam.

use async_trait::async_trait;
use mockall::automock;

use crate::payments::{
    errors::GatewayError,
    models::{GatewayOrderStatus, InitiatedPayment, PaymentRequest},
};

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a hosted checkout for `request`.
    async fn initiate_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<InitiatedPayment, GatewayError>;

    /// Look up the state of a checkout by our merchant order id.
    async fn get_order_status(
        &self,
        gateway_order_id: &str,
    ) -> Result<GatewayOrderStatus, GatewayError>;
}
