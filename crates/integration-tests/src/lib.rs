//! Shared harness for the MunshiJi advisor integration tests.
//!
//! Provides a scripted [`MockGateway`] that answers completion calls by
//! matching substrings of the prompt, plus record fixtures for a busy demo
//! shop and helpers for a frozen clock. No test here touches the network.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use bazarify_advisor::{ChatMessage, CompletionGateway, CompletionOptions, GatewayError};
use bazarify_core::{
    Customer, CustomerId, Order, OrderId, OrderItem, OrderStatus, Product, ProductId, ShopId, Taka,
};

/// The shop id used across fixtures.
pub const TEST_SHOP: ShopId = ShopId::new(42);

/// A deterministic "now" for clock-sensitive assertions.
///
/// # Panics
///
/// Never panics; the timestamp is a valid fixed date.
#[must_use]
pub fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Scripted completion gateway.
///
/// Replies are chosen by substring rules over the concatenated message
/// contents, falling back to a default reply. Every call is recorded for
/// later inspection. Calls matching the failure rule return an error.
pub struct MockGateway {
    default_reply: String,
    rules: Vec<(String, String)>,
    fail_on: Option<String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockGateway {
    /// A gateway that answers everything with `reply`.
    #[must_use]
    pub fn with_reply(reply: &str) -> Self {
        Self {
            default_reply: reply.to_string(),
            rules: Vec::new(),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer calls whose prompt contains `needle` with `reply` instead of
    /// the default.
    #[must_use]
    pub fn with_rule(mut self, needle: &str, reply: &str) -> Self {
        self.rules.push((needle.to_string(), reply.to_string()));
        self
    }

    /// Fail calls whose prompt contains `needle`.
    #[must_use]
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// All recorded calls, in completion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Number of completion calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

impl CompletionGateway for MockGateway {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        _options: CompletionOptions,
    ) -> Result<String, GatewayError> {
        let haystack: String = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.calls.lock().expect("calls lock").push(messages);

        if let Some(needle) = &self.fail_on
            && haystack.contains(needle.as_str())
        {
            return Err(GatewayError::EmptyResponse);
        }

        for (needle, reply) in &self.rules {
            if haystack.contains(needle.as_str()) {
                return Ok(reply.clone());
            }
        }
        Ok(self.default_reply.clone())
    }
}

/// A product fixture.
#[must_use]
pub fn product(id: i64, name: &str, category: &str, price: i64, stock: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: Some(category.to_string()),
        price: Taka::from_major(price),
        stock,
    }
}

/// An order fixture with items given as `(product_id, quantity)` pairs.
#[must_use]
pub fn order(
    id: i64,
    amount: i64,
    status: OrderStatus,
    created_at: Option<DateTime<Utc>>,
    items: &[(i64, i64)],
) -> Order {
    Order {
        id: OrderId::new(id),
        total_amount: Taka::from_major(amount),
        status,
        created_at,
        items: items
            .iter()
            .map(|&(product_id, quantity)| OrderItem {
                product_id: ProductId::new(product_id),
                quantity,
            })
            .collect(),
    }
}

/// Records for a busy grocery with stock trouble: one product out of
/// stock, one low, recent delivered orders, and a few customers.
#[must_use]
pub fn busy_shop_records() -> (Vec<Product>, Vec<Order>, Vec<Customer>) {
    let products = vec![
        product(1, "চাল (প্রতি কেজি)", "মুদি", 75, 400),
        product(2, "পেঁয়াজ (প্রতি কেজি)", "সবজি", 45, 0),
        product(3, "কলা (প্রতি ডজন)", "ফল", 90, 4),
        product(4, "সয়াবিন তেল (১ লিটার)", "মুদি", 165, 80),
    ];

    let now = frozen_now();
    let orders = vec![
        order(1, 600, OrderStatus::Delivered, Some(now - Duration::days(1)), &[(1, 4)]),
        order(2, 450, OrderStatus::Delivered, Some(now - Duration::days(2)), &[(1, 2), (3, 1)]),
        order(3, 780, OrderStatus::Delivered, Some(now - Duration::days(3)), &[(1, 6)]),
        order(4, 320, OrderStatus::Pending, Some(now - Duration::days(1)), &[(3, 2)]),
        order(5, 900, OrderStatus::Cancelled, Some(now - Duration::days(30)), &[]),
    ];

    let customers = vec![
        Customer {
            id: CustomerId::new(1),
            name: "রহিমা বেগম".to_string(),
        },
        Customer {
            id: CustomerId::new(2),
            name: "জামাল হোসেন".to_string(),
        },
    ];

    (products, orders, customers)
}
