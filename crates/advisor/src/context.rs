//! Business context aggregation.
//!
//! Reduces the raw record collections of one shop into a normalized snapshot
//! of business health: revenue aggregates, stock partitions, a 7-day sales
//! time series, an order status breakdown, and derived boolean flags.
//!
//! The context is rebuilt for every request and owned by that request's
//! processing lifetime - it is never cached or shared. Building never fails:
//! a store error degrades to the all-zero [`BusinessContext::default()`] so
//! downstream logic never has to null-check.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use bazarify_core::{Customer, Order, OrderStatus, Product, ShopId, Taka};

use crate::store::RecordStore;

/// Stock below this (but above zero) counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Trailing window for "recent" sales, in days.
pub const RECENT_WINDOW_DAYS: u64 = 7;

/// One calendar day of sales within the recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesDay {
    pub date: NaiveDate,
    pub amount: Taka,
    pub count: u64,
}

/// Order counts per lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

/// Normalized snapshot of one shop's business state.
///
/// Every numeric aggregate is non-negative and every `has_*` flag is a pure
/// function of the corresponding collection - the flags are computed at
/// build time and never settable independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessContext {
    // Raw collections
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub customers: Vec<Customer>,
    /// Orders with a parseable timestamp inside the trailing window.
    pub recent_orders: Vec<Order>,

    // Scalar aggregates
    pub total_products: usize,
    pub total_orders: usize,
    pub total_customers: usize,
    pub total_revenue: Taka,
    /// Revenue restricted to delivered orders.
    pub confirmed_revenue: Taka,
    /// Revenue over the recent window.
    pub weekly_revenue: Taka,
    pub average_order_value: Taka,

    // Stock partitions
    pub low_stock_products: Vec<Product>,
    pub out_of_stock_products: Vec<Product>,
    pub well_stocked_products: Vec<Product>,

    // Time series and breakdowns
    pub sales_data: Vec<SalesDay>,
    pub orders_by_status: OrderStatusCounts,

    // Derived flags
    pub has_products: bool,
    pub has_orders: bool,
    pub has_customers: bool,
    pub has_low_stock: bool,
    pub has_out_of_stock: bool,
    pub has_sales_data: bool,

    /// Deduplicated non-empty product categories, in first-seen order.
    pub categories: Vec<String>,
}

impl BusinessContext {
    /// Build the context for a shop using the current wall clock.
    ///
    /// Never fails: any store error is logged and replaced with the empty
    /// fallback context.
    pub async fn build<S: RecordStore>(store: &S, shop_id: ShopId) -> Self {
        Self::build_at(store, shop_id, Utc::now()).await
    }

    /// Build the context with an explicit `now`, for deterministic tests.
    #[instrument(skip(store), fields(shop_id = %shop_id))]
    pub async fn build_at<S: RecordStore>(
        store: &S,
        shop_id: ShopId,
        now: DateTime<Utc>,
    ) -> Self {
        let (products, orders, customers) = tokio::join!(
            store.products(shop_id),
            store.orders(shop_id),
            store.customers(shop_id),
        );

        match (products, orders, customers) {
            (Ok(products), Ok(orders), Ok(customers)) => {
                Self::from_records(products, orders, customers, now)
            }
            (products, orders, customers) => {
                let failed: Vec<&str> = [
                    ("products", products.is_err()),
                    ("orders", orders.is_err()),
                    ("customers", customers.is_err()),
                ]
                .into_iter()
                .filter_map(|(name, is_err)| is_err.then_some(name))
                .collect();
                warn!(?failed, "record fetch failed, using empty context");
                Self::default()
            }
        }
    }

    /// Reduce fetched records into a context. Pure given its inputs.
    #[must_use]
    pub fn from_records(
        products: Vec<Product>,
        orders: Vec<Order>,
        customers: Vec<Customer>,
        now: DateTime<Utc>,
    ) -> Self {
        let window_start = now
            .checked_sub_days(Days::new(RECENT_WINDOW_DAYS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        // Stock partitions and category set, single pass
        let mut low_stock_products = Vec::new();
        let mut out_of_stock_products = Vec::new();
        let mut well_stocked_products = Vec::new();
        let mut categories: Vec<String> = Vec::new();

        for product in &products {
            let stock = product.stock.max(0);
            if stock == 0 {
                out_of_stock_products.push(product.clone());
            } else if stock < LOW_STOCK_THRESHOLD {
                low_stock_products.push(product.clone());
            } else {
                well_stocked_products.push(product.clone());
            }

            if let Some(category) = &product.category {
                let trimmed = category.trim();
                if !trimmed.is_empty() && !categories.iter().any(|c| c == trimmed) {
                    categories.push(trimmed.to_string());
                }
            }
        }

        // Revenue aggregates, status breakdown, and the recent window,
        // single pass. Orders without a parseable timestamp are excluded
        // from the window but still count toward totals.
        let mut total_revenue = Taka::ZERO;
        let mut confirmed_revenue = Taka::ZERO;
        let mut weekly_revenue = Taka::ZERO;
        let mut orders_by_status = OrderStatusCounts::default();
        let mut recent_orders: Vec<Order> = Vec::new();
        let mut sales_by_day: BTreeMap<NaiveDate, (Taka, u64)> = BTreeMap::new();

        for order in &orders {
            let amount = order.total_amount.clamp_non_negative();
            total_revenue += amount;

            match order.status {
                OrderStatus::Pending => orders_by_status.pending += 1,
                OrderStatus::Processing => orders_by_status.processing += 1,
                OrderStatus::Delivered => {
                    orders_by_status.delivered += 1;
                    confirmed_revenue += amount;
                }
                OrderStatus::Cancelled => orders_by_status.cancelled += 1,
            }

            if let Some(created_at) = order.created_at
                && created_at >= window_start
            {
                weekly_revenue += amount;
                let day = sales_by_day.entry(created_at.date_naive()).or_default();
                day.0 += amount;
                day.1 += 1;
                recent_orders.push(order.clone());
            }
        }

        let sales_data: Vec<SalesDay> = sales_by_day
            .into_iter()
            .map(|(date, (amount, count))| SalesDay {
                date,
                amount,
                count,
            })
            .collect();

        let total_products = products.len();
        let total_orders = orders.len();
        let total_customers = customers.len();
        let average_order_value = total_revenue.divided_by(total_orders as u64);

        Self {
            has_products: total_products > 0,
            has_orders: total_orders > 0,
            has_customers: total_customers > 0,
            has_low_stock: !low_stock_products.is_empty(),
            has_out_of_stock: !out_of_stock_products.is_empty(),
            has_sales_data: !sales_data.is_empty(),
            total_products,
            total_orders,
            total_customers,
            total_revenue,
            confirmed_revenue,
            weekly_revenue,
            average_order_value,
            low_stock_products,
            out_of_stock_products,
            well_stocked_products,
            sales_data,
            orders_by_status,
            categories,
            products,
            orders,
            customers,
            recent_orders,
        }
    }

    /// Fraction of orders delivered, in `0.0..=1.0`. Zero when there are
    /// no orders.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn delivery_rate(&self) -> f64 {
        if self.total_orders == 0 {
            0.0
        } else {
            self.orders_by_status.delivered as f64 / self.total_orders as f64
        }
    }
}
