//! Applying gateway order status to stored payments.

use jiff::Timestamp;
use serde_json::json;

use crate::{
    domain::orders::{checkout::payment_status_for, models::PaymentUpdate},
    payments::GatewayOrderStatus,
};

/// Build the payment update for a gateway status report.
///
/// Returns `None` while the gateway still reports the payment as pending.
pub(crate) fn plan_payment_update(
    status: &GatewayOrderStatus,
    checked_at: Timestamp,
) -> Option<PaymentUpdate> {
    let payment_status = payment_status_for(&status.state);

    payment_status.implied_order_status()?;

    let attempt = status.payment_details.first();

    let info = json!({
        "gateway_state": String::from(status.state.clone()),
        "timestamp": attempt.and_then(|a| a.timestamp),
        "error_code": attempt.and_then(|a| a.error_code.clone()),
        "error_detail": attempt.and_then(|a| a.detailed_error_code.clone()),
        "last_checked": checked_at.to_string(),
    });

    Some(PaymentUpdate {
        payment_status,
        transaction_id: attempt.and_then(|a| a.transaction_id.clone()),
        payment_method: attempt.and_then(|a| a.payment_mode.clone()),
        info,
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::orders::models::PaymentStatus,
        payments::{GatewayState, PaymentAttempt},
    };

    use super::*;

    #[test]
    fn pending_report_changes_nothing() {
        let status = GatewayOrderStatus {
            state: GatewayState::Pending,
            payment_details: Vec::new(),
        };

        assert_eq!(plan_payment_update(&status, Timestamp::UNIX_EPOCH), None);
    }

    #[test]
    fn completed_report_copies_first_attempt() {
        let status = GatewayOrderStatus {
            state: GatewayState::Completed,
            payment_details: vec![
                PaymentAttempt {
                    transaction_id: Some("OM2510".to_string()),
                    payment_mode: Some("UPI_QR".to_string()),
                    timestamp: Some(1_760_000_000_000),
                    ..PaymentAttempt::default()
                },
                PaymentAttempt {
                    transaction_id: Some("OM2509".to_string()),
                    ..PaymentAttempt::default()
                },
            ],
        };

        let update = plan_payment_update(&status, Timestamp::UNIX_EPOCH);

        assert_eq!(
            update.as_ref().map(|u| u.payment_status),
            Some(PaymentStatus::Completed)
        );
        assert_eq!(
            update.as_ref().and_then(|u| u.transaction_id.as_deref()),
            Some("OM2510")
        );
        assert_eq!(
            update.as_ref().and_then(|u| u.payment_method.as_deref()),
            Some("UPI_QR")
        );
        assert_eq!(
            update.as_ref().map(|u| u.info["timestamp"].clone()),
            Some(json!(1_760_000_000_000_i64))
        );
    }

    #[test]
    fn failed_report_without_details_keeps_diagnostics_empty() {
        let status = GatewayOrderStatus {
            state: GatewayState::Failed,
            payment_details: Vec::new(),
        };

        let update = plan_payment_update(&status, Timestamp::UNIX_EPOCH);

        assert_eq!(
            update.as_ref().map(|u| u.payment_status),
            Some(PaymentStatus::Failed)
        );
        assert_eq!(update.as_ref().and_then(|u| u.transaction_id.clone()), None);
        assert_eq!(
            update.as_ref().map(|u| u.info["error_code"].is_null()),
            Some(true)
        );
    }
}
