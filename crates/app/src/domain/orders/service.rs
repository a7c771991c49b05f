//! Orders service: checkout, history and lazy status reconciliation.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde_json::json;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::{
    auth::UserId,
    database::Db,
    domain::{
        addresses::{models::AddressId, repository::PgAddressesRepository},
        carts::repositories::{PgCartItemsRepository, PgCartsRepository},
        orders::{
            checkout::{
                callback_url, freeze_cart_lines, initiated_payment_info, new_gateway_order_id,
                payment_status_for,
            },
            errors::OrdersServiceError,
            models::{
                CheckoutReceipt, NewOrder, NewPayment, Order, OrderDetails, OrderId,
                OrderStatus, PaymentStatus, Reconciliation,
            },
            reconcile::plan_payment_update,
            repositories::{PgOrdersRepository, PgPaymentsRepository},
        },
    },
    payments::{GatewayError, GatewayState, PaymentGateway, PaymentRequest},
};

/// Checkout settings.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Storefront base URL; the gateway returns customers to
    /// `{callback_base_url}/order/status/{order_id}`.
    pub callback_base_url: String,

    /// Upper bound on every payment gateway call.
    pub gateway_timeout: Duration,
}

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    gateway: Arc<dyn PaymentGateway>,
    settings: CheckoutSettings,
    orders_repository: PgOrdersRepository,
    payments_repository: PgPaymentsRepository,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
    addresses_repository: PgAddressesRepository,
}

impl std::fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>, settings: CheckoutSettings) -> Self {
        Self {
            db,
            gateway,
            settings,
            orders_repository: PgOrdersRepository::new(),
            payments_repository: PgPaymentsRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            addresses_repository: PgAddressesRepository::new(),
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        timeout(self.settings.gateway_timeout, call)
            .await
            .map_err(|_elapsed| GatewayError::Timeout)?
    }

    /// Ask the gateway about a pending order and store any final state.
    async fn reconcile(&self, order: &Order) -> Result<Reconciliation, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let payments = self.payments_repository.list_payments(&mut tx, order.id).await?;

        tx.commit().await?;

        let Some(latest) = payments.first() else {
            return Ok(Reconciliation::Unchanged);
        };

        let status = match self
            .bounded(self.gateway.get_order_status(&latest.gateway_order_id))
            .await
        {
            Ok(status) => status,
            Err(error) => {
                warn!(
                    order_id = %order.id,
                    gateway_order_id = %latest.gateway_order_id,
                    error = %error,
                    "payment status check skipped"
                );

                return Ok(Reconciliation::Skipped);
            }
        };

        let Some(update) = plan_payment_update(&status, Timestamp::now()) else {
            if let GatewayState::Other(state) = &status.state {
                warn!(order_id = %order.id, state, "unknown gateway state treated as pending");
            }

            return Ok(Reconciliation::Unchanged);
        };

        let payment_status = update.payment_status;
        let order_status = payment_status
            .implied_order_status()
            .unwrap_or(OrderStatus::Pending);

        let mut tx = self.db.begin().await?;

        let updated = self
            .orders_repository
            .update_pending_order_status(&mut tx, order.id, payment_status, order_status)
            .await?;

        if updated.is_none() {
            // Another request already moved the order on.
            tx.rollback().await?;

            return Ok(Reconciliation::NotNeeded);
        }

        self.payments_repository
            .update_payment_status(&mut tx, latest.id, update)
            .await?;

        tx.commit().await?;

        info!(
            order_id = %order.id,
            payment_status = %payment_status,
            order_status = %order_status,
            "order status reconciled"
        );

        Ok(Reconciliation::Updated)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn checkout(
        &self,
        user: UserId,
        address: AddressId,
    ) -> Result<CheckoutReceipt, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self
            .addresses_repository
            .get_address(&mut tx, address, user)
            .await?
            .ok_or(OrdersServiceError::AddressNotFound)?;

        let cart = self
            .carts_repository
            .lock_user_cart(&mut tx, user)
            .await?
            .ok_or(OrdersServiceError::CartNotFound)?;

        let lines = self
            .cart_items_repository
            .list_cart_lines(&mut tx, cart.id)
            .await?;

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let priced = freeze_cart_lines(lines)?;
        let total_items = priced.items.len();

        let order = self
            .orders_repository
            .create_order(
                &mut tx,
                NewOrder {
                    user_id: user,
                    items: priced.items,
                    order_amount: priced.order_amount,
                    delivery_address: address.delivery_line(),
                    additional_info: json!({
                        "address_id": address.id,
                        "total_items": total_items,
                    }),
                },
            )
            .await?;

        let gateway_order_id = new_gateway_order_id();
        let callback_url = callback_url(&self.settings.callback_base_url, order.id);

        let initiated = match self
            .bounded(self.gateway.initiate_payment(PaymentRequest {
                gateway_order_id: gateway_order_id.clone(),
                amount_minor: order.order_amount,
                callback_url: callback_url.clone(),
            }))
            .await
        {
            Ok(initiated) => initiated,
            Err(error) => {
                warn!(
                    user_id = %user,
                    gateway_order_id,
                    error = %error,
                    "payment initiation failed"
                );

                tx.rollback().await?;

                return Err(OrdersServiceError::PaymentInitiationFailed(error));
            }
        };

        let payment = self
            .payments_repository
            .create_payment(
                &mut tx,
                NewPayment {
                    order_id: order.id,
                    amount: order.order_amount,
                    gateway_order_id: gateway_order_id.clone(),
                    payment_status: payment_status_for(&initiated.state),
                    additional_info: initiated_payment_info(&initiated, &callback_url),
                },
            )
            .await?;

        self.orders_repository
            .set_order_payment(&mut tx, order.id, payment.id)
            .await?;

        self.cart_items_repository
            .clear_cart_items(&mut tx, cart.id)
            .await?;

        tx.commit().await?;

        info!(
            user_id = %user,
            order_id = %order.id,
            payment_id = %payment.id,
            order_amount = order.order_amount,
            "order created"
        );

        Ok(CheckoutReceipt {
            order_id: order.id,
            gateway_order_id,
            redirect_url: initiated.redirect_url,
            order_amount: order.order_amount,
        })
    }

    async fn list_orders(&self, user: UserId) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_orders(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order_details(
        &self,
        user: UserId,
        order: OrderId,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self
            .orders_repository
            .get_order(&mut tx, order, user)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        tx.commit().await?;

        let reconciliation = if stored.payment_status == PaymentStatus::Pending {
            self.reconcile(&stored).await?
        } else {
            Reconciliation::NotNeeded
        };

        let mut tx = self.db.begin().await?;

        let order = self
            .orders_repository
            .get_order(&mut tx, order, user)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let payments = self.payments_repository.list_payments(&mut tx, order.id).await?;

        tx.commit().await?;

        Ok(OrderDetails {
            order,
            payments,
            reconciliation,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Convert the user's cart into a pending order and start a gateway payment.
    ///
    /// Either the order, its payment and the emptied cart are all committed, or
    /// nothing changes.
    async fn checkout(
        &self,
        user: UserId,
        address: AddressId,
    ) -> Result<CheckoutReceipt, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_orders(&self, user: UserId) -> Result<Vec<Order>, OrdersServiceError>;

    /// An order and its payments. Pending orders are first checked against the
    /// gateway; gateway failures leave the stored state untouched.
    async fn get_order_details(
        &self,
        user: UserId,
        order: OrderId,
    ) -> Result<OrderDetails, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            addresses::AddressesService,
            carts::{
                CartsService,
                models::{CartItemUpsert, CartOwner},
            },
        },
        payments::{GatewayOrderStatus, InitiatedPayment, MockPaymentGateway, PaymentAttempt},
        test::{
            TestContext,
            helpers::{insert_product, insert_variant, new_address, register_user},
        },
    };

    use super::*;

    struct Fixture {
        user: UserId,
        address: AddressId,
    }

    /// A user with an address and a cart holding 2 x 249.50 at 10% off.
    async fn filled_cart(ctx: &TestContext) -> TestResult<Fixture> {
        let user = register_user(ctx, "9876543210").await?;
        let address = ctx.addresses.create_address(user, new_address(true)).await?;

        let product = insert_product(
            ctx,
            "Hyderabadi Biryani",
            Decimal::from_str_exact("10.00")?,
            true,
        )
        .await?;
        let variant =
            insert_variant(ctx, product, "Full", Decimal::from_str_exact("249.50")?, true).await?;

        ctx.carts
            .upsert_item(
                CartOwner::User(user),
                CartItemUpsert {
                    product_id: Some(product),
                    variant_id: variant,
                    quantity: 2,
                },
            )
            .await?;

        Ok(Fixture {
            user,
            address: address.id,
        })
    }

    fn accepting_gateway() -> MockPaymentGateway {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_initiate_payment()
            .once()
            .withf(|request| {
                request.amount_minor == 44_910 && request.callback_url.contains("/order/status/")
            })
            .returning(|_| {
                Ok(InitiatedPayment {
                    gateway_reference: Some("OMO2510".to_string()),
                    state: GatewayState::Pending,
                    redirect_url: "https://gateway.test/pay/OMO2510".to_string(),
                    expire_at: Some(1_760_000_000_000),
                })
            });

        gateway
    }

    #[tokio::test]
    async fn checkout_creates_order_and_clears_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = filled_cart(&ctx).await?;
        let orders = ctx.orders_with_gateway(accepting_gateway());

        let receipt = orders.checkout(fixture.user, fixture.address).await?;

        assert_eq!(receipt.order_amount, 44_910);
        assert_eq!(receipt.redirect_url, "https://gateway.test/pay/OMO2510");

        let cart = ctx.carts.list_items(CartOwner::User(fixture.user)).await?;

        assert!(cart.items.is_empty(), "expected cart to be cleared");

        let listed = orders.list_orders(fixture.user).await?;
        let order = listed.first();

        assert_eq!(listed.len(), 1);
        assert_eq!(order.map(|o| o.order_status), Some(OrderStatus::Pending));
        assert_eq!(order.map(|o| o.items.len()), Some(1));
        assert_eq!(
            order.map(|o| o.delivery_address.as_str()),
            Some("12 MG Road, Bengaluru, Karnataka - 560001")
        );
        assert!(
            order.is_some_and(|o| o.payment_id.is_some()),
            "expected order to reference its payment"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_payment_initiation_rolls_back() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = filled_cart(&ctx).await?;

        let mut gateway = MockPaymentGateway::new();

        gateway.expect_initiate_payment().once().returning(|_| {
            Err(GatewayError::UnexpectedResponse(
                "pay request failed with status 500".to_string(),
            ))
        });

        let orders = ctx.orders_with_gateway(gateway);

        let result = orders.checkout(fixture.user, fixture.address).await;

        assert!(
            matches!(result, Err(OrdersServiceError::PaymentInitiationFailed(_))),
            "expected PaymentInitiationFailed, got {result:?}"
        );

        assert!(orders.list_orders(fixture.user).await?.is_empty());

        let cart = ctx.carts.list_items(CartOwner::User(fixture.user)).await?;

        assert_eq!(cart.total_items, 1, "expected cart to be left intact");

        Ok(())
    }

    #[tokio::test]
    async fn checkout_without_cart_is_cart_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "9876543210").await?;
        let address = ctx.addresses.create_address(user, new_address(true)).await?;

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_initiate_payment().never();

        let result = ctx
            .orders_with_gateway(gateway)
            .checkout(user, address.id)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::CartNotFound)),
            "expected CartNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_empty_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "9876543210").await?;
        let address = ctx.addresses.create_address(user, new_address(true)).await?;

        ctx.carts.resolve_or_create_cart(CartOwner::User(user)).await?;

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_initiate_payment().never();

        let result = ctx
            .orders_with_gateway(gateway)
            .checkout(user, address.id)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_someone_elses_address_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = filled_cart(&ctx).await?;
        let other = register_user(&ctx, "8765432109").await?;

        let mut gateway = MockPaymentGateway::new();
        gateway.expect_initiate_payment().never();

        let result = ctx
            .orders_with_gateway(gateway)
            .checkout(other, fixture.address)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::AddressNotFound)),
            "expected AddressNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn pending_order_details_apply_completed_gateway_state() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = filled_cart(&ctx).await?;

        let mut gateway = accepting_gateway();

        gateway
            .expect_get_order_status()
            .once()
            .returning(|_| {
                Ok(GatewayOrderStatus {
                    state: GatewayState::Completed,
                    payment_details: vec![PaymentAttempt {
                        transaction_id: Some("T2510".to_string()),
                        payment_mode: Some("UPI_INTENT".to_string()),
                        ..PaymentAttempt::default()
                    }],
                })
            });

        let orders = ctx.orders_with_gateway(gateway);
        let receipt = orders.checkout(fixture.user, fixture.address).await?;

        let details = orders
            .get_order_details(fixture.user, receipt.order_id)
            .await?;

        assert_eq!(details.reconciliation, Reconciliation::Updated);
        assert_eq!(details.order.payment_status, PaymentStatus::Completed);
        assert_eq!(details.order.order_status, OrderStatus::Confirmed);
        assert!(details.status_updated());

        let payment = details.payments.first();

        assert_eq!(
            payment.and_then(|p| p.transaction_id.as_deref()),
            Some("T2510")
        );
        assert_eq!(payment.map(|p| p.payment_method.as_str()), Some("UPI_INTENT"));
        assert_eq!(
            payment.map(|p| p.gateway_order_id.as_str()),
            Some(receipt.gateway_order_id.as_str())
        );

        Ok(())
    }

    #[tokio::test]
    async fn gateway_error_keeps_order_pending() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = filled_cart(&ctx).await?;

        let mut gateway = accepting_gateway();

        gateway
            .expect_get_order_status()
            .once()
            .returning(|_| Err(GatewayError::Timeout));

        let orders = ctx.orders_with_gateway(gateway);
        let receipt = orders.checkout(fixture.user, fixture.address).await?;

        let details = orders
            .get_order_details(fixture.user, receipt.order_id)
            .await?;

        assert_eq!(details.reconciliation, Reconciliation::Skipped);
        assert_eq!(details.order.payment_status, PaymentStatus::Pending);
        assert!(!details.status_updated());

        Ok(())
    }

    #[tokio::test]
    async fn other_users_order_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let fixture = filled_cart(&ctx).await?;
        let other = register_user(&ctx, "8765432109").await?;

        let orders = ctx.orders_with_gateway(accepting_gateway());
        let receipt = orders.checkout(fixture.user, fixture.address).await?;

        let result = orders.get_order_details(other, receipt.order_id).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
