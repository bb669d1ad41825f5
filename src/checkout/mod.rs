//! Order submission.
//!
//! Turns a session cart plus the shipping form into a durable order:
//! allocates a unique order number (retrying on collisions), fires the
//! admin/customer notification without blocking the flow, and clears the
//! cart only once the order is persisted.

pub mod order_number;
pub mod shipping;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::cart::{self, CartLine};
use crate::domain::aggregates::order::{NewOrder, Order, OrderItem};
use crate::domain::value_objects::currency_symbol;
use crate::notify::OrderNotifier;
use crate::store::{CartStore, InsertError, OrderStore};

pub const MAX_NUMBER_ATTEMPTS: u32 = 5;

pub const CURRENCY: &str = "GEL";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email address is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[serde(default)]
    pub house_number: String,
    #[serde(default)]
    pub post_code: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
}

/// Transient hand-off to the confirmation view. Not persisted: a reload
/// falls back to the order record itself.
#[derive(Debug, Clone, Serialize)]
pub struct Confirmation {
    pub order_id: Uuid,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub currency_symbol: &'static str,
    /// Longest advertised delivery window across the ordered items.
    /// Informational only.
    pub delivery_days: i32,
    pub payment_url: String,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid checkout form: {0}")]
    InvalidForm(String),

    #[error("could not allocate a unique order number, please try again")]
    OrderNumbersExhausted,

    #[error("order could not be saved: {0}")]
    Store(String),
}

pub struct Coordinator {
    orders: Arc<dyn OrderStore>,
    cart: Arc<dyn CartStore>,
    notifier: Arc<dyn OrderNotifier>,
    payment_page_url: String,
    notify_timeout: Duration,
}

impl Coordinator {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        cart: Arc<dyn CartStore>,
        notifier: Arc<dyn OrderNotifier>,
        payment_page_url: String,
        notify_timeout: Duration,
    ) -> Self {
        Self { orders, cart, notifier, payment_page_url, notify_timeout }
    }

    /// Submit the session's cart as an order.
    ///
    /// On any error the cart is left untouched so the customer can retry.
    pub async fn submit(
        &self,
        session_id: &str,
        form: CheckoutForm,
        user_id: Option<Uuid>,
    ) -> Result<(Order, Confirmation), CheckoutError> {
        form.validate()
            .map_err(|e| CheckoutError::InvalidForm(e.to_string()))?;

        // The storefront opens the hosted payment page inside the user's
        // click; everything the hand-off needs is fixed before the first
        // await.
        let payment_url = self.payment_page_url.clone();

        let lines = self
            .cart
            .lines(session_id)
            .await
            .map_err(|e| CheckoutError::Store(e.to_string()))?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let items: Vec<OrderItem> = lines.iter().map(CartLine::snapshot).collect();
        let subtotal = cart::subtotal(&lines);
        let shipping_fee = shipping::fee(&form.city);
        let total_amount = subtotal + shipping_fee;
        let delivery_days = lines.iter().map(|l| l.delivery_days).max().unwrap_or(0);

        let base = NewOrder {
            order_number: String::new(),
            user_id,
            customer_name: form.name,
            customer_email: form.email,
            customer_phone: form.phone,
            shipping_address: compose_address(&form.address, &form.house_number, &form.post_code, &form.city),
            total_amount,
            currency: CURRENCY.to_string(),
            items,
        };
        let order = self.insert_with_fresh_number(base).await?;

        self.dispatch_notification(&order).await;

        if let Err(e) = self.cart.clear(session_id).await {
            tracing::warn!(session_id, "failed to clear cart after checkout: {e}");
        }

        let confirmation = Confirmation {
            order_id: order.id,
            order_number: order.order_number.clone(),
            items: order.items.0.clone(),
            subtotal,
            shipping_fee,
            total_amount: order.total_amount,
            currency: order.currency.clone(),
            currency_symbol: currency_symbol(&order.currency),
            delivery_days,
            payment_url,
        };
        Ok((order, confirmation))
    }

    /// One insert attempt per candidate number, sequential, capped. A
    /// collision rolls a new number; any other error will not be fixed by
    /// retrying and aborts.
    async fn insert_with_fresh_number(&self, base: NewOrder) -> Result<Order, CheckoutError> {
        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let candidate = order_number::generate();
            let attempt = NewOrder { order_number: candidate, ..base.clone() };
            match self.orders.insert(attempt).await {
                Ok(order) => return Ok(order),
                Err(InsertError::DuplicateOrderNumber) => continue,
                Err(InsertError::Other(e)) => return Err(CheckoutError::Store(e)),
            }
        }
        Err(CheckoutError::OrderNumbersExhausted)
    }

    /// Race the dispatch against a timer. The loser is never cancelled: a
    /// late dispatch keeps running detached and may still deliver.
    async fn dispatch_notification(&self, order: &Order) {
        let notifier = Arc::clone(&self.notifier);
        let payload = order.clone();
        let task = tokio::spawn(async move { notifier.order_placed(payload).await });

        match tokio::time::timeout(self.notify_timeout, task).await {
            Ok(Ok(outcome)) => {
                if !outcome.admin_sent {
                    tracing::warn!(order_number = %order.order_number, "admin notification not sent");
                }
                if !outcome.customer_sent {
                    tracing::warn!(order_number = %order.order_number, "customer confirmation not sent");
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(order_number = %order.order_number, "notification task failed: {e}")
            }
            Err(_) => tracing::warn!(
                order_number = %order.order_number,
                "order notification still pending after {:?}, proceeding",
                self.notify_timeout
            ),
        }
    }
}

/// Street, house number, post code and city joined with commas, skipping
/// whatever was left blank.
fn compose_address(address: &str, house_number: &str, post_code: &str, city: &str) -> String {
    [address, house_number, post_code, city]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::notify::DispatchOutcome;
    use crate::store::memory::{MemCartStore, MemOrderStore};

    struct QuietNotifier;

    #[async_trait]
    impl OrderNotifier for QuietNotifier {
        async fn order_placed(&self, _order: Order) -> DispatchOutcome {
            DispatchOutcome { admin_sent: true, customer_sent: true, skipped: vec![] }
        }

        async fn status_changed(&self, _order: Order, _new_status: String) -> DispatchOutcome {
            DispatchOutcome { admin_sent: false, customer_sent: true, skipped: vec![] }
        }
    }

    struct HangingNotifier;

    #[async_trait]
    impl OrderNotifier for HangingNotifier {
        async fn order_placed(&self, _order: Order) -> DispatchOutcome {
            std::future::pending().await
        }

        async fn status_changed(&self, _order: Order, _new_status: String) -> DispatchOutcome {
            std::future::pending().await
        }
    }

    /// Fails every insert with the configured error, counting attempts.
    struct FailingOrderStore {
        attempts: AtomicU32,
        duplicate: bool,
    }

    impl FailingOrderStore {
        fn new(duplicate: bool) -> Self {
            Self { attempts: AtomicU32::new(0), duplicate }
        }
    }

    #[async_trait]
    impl OrderStore for FailingOrderStore {
        async fn insert(&self, _order: NewOrder) -> Result<Order, InsertError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.duplicate {
                Err(InsertError::DuplicateOrderNumber)
            } else {
                Err(InsertError::Other("connection reset".into()))
            }
        }
    }

    fn cart_line(name: &str, price: i64, quantity: i32, size: &str) -> CartLine {
        CartLine {
            id: Uuid::new_v4(),
            session_id: "s1".into(),
            product_id: Uuid::new_v4(),
            name: name.into(),
            size: size.into(),
            quantity,
            unit_price: Decimal::from(price),
            delivery_days: 5,
            created_at: Utc::now(),
        }
    }

    fn form(city: &str) -> CheckoutForm {
        CheckoutForm {
            name: "Nino Beridze".into(),
            email: "nino@example.com".into(),
            phone: "+995 555 123456".into(),
            address: "Rustaveli 12".into(),
            house_number: String::new(),
            post_code: "0105".into(),
            city: city.into(),
        }
    }

    fn coordinator(
        orders: Arc<dyn OrderStore>,
        cart: Arc<dyn CartStore>,
        notifier: Arc<dyn OrderNotifier>,
    ) -> Coordinator {
        Coordinator::new(
            orders,
            cart,
            notifier,
            "https://pay.example.com/aurora".into(),
            Duration::from_secs(8),
        )
    }

    #[tokio::test]
    async fn submits_a_cart_as_a_pending_order() {
        let cart = Arc::new(MemCartStore::with_lines("s1", vec![cart_line("Coat", 500, 1, "M")]));
        let orders = Arc::new(MemOrderStore::new());
        let c = coordinator(orders.clone(), cart.clone(), Arc::new(QuietNotifier));

        let (order, confirmation) = c.submit("s1", form("Tbilisi"), None).await.unwrap();

        assert_eq!(order.status, "pending");
        assert_eq!(order.total_amount, Decimal::from(505));
        assert!(order_number::is_well_formed(&order.order_number));
        assert_eq!(order.items.0.len(), 1);
        let item = &order.items.0[0];
        assert_eq!(item.name, "Coat");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.size, "M");
        assert_eq!(item.price, Decimal::from(500));

        assert_eq!(confirmation.subtotal, Decimal::from(500));
        assert_eq!(confirmation.shipping_fee, Decimal::from(5));
        assert_eq!(confirmation.currency_symbol, "₾");
        assert_eq!(confirmation.payment_url, "https://pay.example.com/aurora");

        // durable and gone from the cart
        assert_eq!(orders.orders().len(), 1);
        assert!(cart.lines("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn order_item_price_is_the_cart_time_price() {
        // Product cost 100 when it entered the cart; the catalog now says
        // 150. The order must say 100.
        let line = cart_line("Dress", 100, 1, "S");
        let cart = Arc::new(MemCartStore::with_lines("s1", vec![line]));
        let orders = Arc::new(MemOrderStore::new());
        let c = coordinator(orders, cart, Arc::new(QuietNotifier));

        let (order, _) = c.submit("s1", form("Tbilisi"), None).await.unwrap();
        assert_eq!(order.items.0[0].price, Decimal::from(100));
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let cart = Arc::new(MemCartStore::new());
        let c = coordinator(Arc::new(MemOrderStore::new()), cart, Arc::new(QuietNotifier));
        let err = c.submit("s1", form("Tbilisi"), None).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn collisions_retry_up_to_the_cap_and_keep_the_cart() {
        let cart = Arc::new(MemCartStore::with_lines("s1", vec![cart_line("Coat", 500, 1, "M")]));
        let store = Arc::new(FailingOrderStore::new(true));
        let c = coordinator(store.clone(), cart.clone(), Arc::new(QuietNotifier));

        let err = c.submit("s1", form("Tbilisi"), None).await.unwrap_err();

        assert!(matches!(err, CheckoutError::OrderNumbersExhausted));
        assert_eq!(store.attempts.load(Ordering::SeqCst), MAX_NUMBER_ATTEMPTS);
        assert_eq!(cart.lines("s1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn non_uniqueness_errors_abort_on_the_first_attempt() {
        let cart = Arc::new(MemCartStore::with_lines("s1", vec![cart_line("Coat", 500, 1, "M")]));
        let store = Arc::new(FailingOrderStore::new(false));
        let c = coordinator(store.clone(), cart.clone(), Arc::new(QuietNotifier));

        let err = c.submit("s1", form("Tbilisi"), None).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Store(_)));
        assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(cart.lines("s1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_two_orders_share_an_order_number() {
        let orders = Arc::new(MemOrderStore::new());
        for i in 0..200 {
            let session = format!("s{i}");
            let cart = Arc::new(MemCartStore::with_lines(&session, vec![cart_line("Coat", 500, 1, "M")]));
            let c = coordinator(orders.clone(), cart, Arc::new(QuietNotifier));
            c.submit(&session, form("Tbilisi"), None).await.unwrap();
        }

        let mut numbers: Vec<String> =
            orders.orders().into_iter().map(|o| o.order_number).collect();
        let total = numbers.len();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), total);
        assert_eq!(total, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn a_hanging_dispatch_delays_at_most_the_timeout() {
        let cart = Arc::new(MemCartStore::with_lines("s1", vec![cart_line("Coat", 500, 1, "M")]));
        let orders = Arc::new(MemOrderStore::new());
        let c = coordinator(orders.clone(), cart.clone(), Arc::new(HangingNotifier));

        let started = tokio::time::Instant::now();
        let result = c.submit("s1", form("Tbilisi"), None).await;
        let elapsed = started.elapsed();

        assert!(result.is_ok());
        assert!(elapsed >= Duration::from_secs(8), "returned before the timeout: {elapsed:?}");
        assert!(elapsed < Duration::from_secs(9), "hung past the timeout: {elapsed:?}");
        // the flow still completed: order persisted, cart cleared
        assert_eq!(orders.orders().len(), 1);
        assert!(cart.lines("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shipping_fee_follows_the_city() {
        for (city, expected) in [("Tbilisi", 505), ("Batumi", 510)] {
            let session = format!("fee-{city}");
            let cart =
                Arc::new(MemCartStore::with_lines(&session, vec![cart_line("Coat", 500, 1, "M")]));
            let c = coordinator(Arc::new(MemOrderStore::new()), cart, Arc::new(QuietNotifier));
            let (order, _) = c.submit(&session, form(city), None).await.unwrap();
            assert_eq!(order.total_amount, Decimal::from(expected));
        }
    }

    #[test]
    fn address_composition_skips_blank_parts() {
        assert_eq!(
            compose_address("Rustaveli 12", "", "0105", "Tbilisi"),
            "Rustaveli 12, 0105, Tbilisi"
        );
        assert_eq!(compose_address("Rustaveli 12", "4a", "0105", "Tbilisi"),
            "Rustaveli 12, 4a, 0105, Tbilisi");
        assert_eq!(compose_address("Rustaveli 12", " ", "", ""), "Rustaveli 12");
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_before_any_persistence() {
        let cart = Arc::new(MemCartStore::with_lines("s1", vec![cart_line("Coat", 500, 1, "M")]));
        let store = Arc::new(FailingOrderStore::new(false));
        let c = coordinator(store.clone(), cart, Arc::new(QuietNotifier));

        let mut bad = form("Tbilisi");
        bad.email = "not-an-email".into();
        let err = c.submit("s1", bad, None).await.unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidForm(_)));
        assert_eq!(store.attempts.load(Ordering::SeqCst), 0);
    }
}
