//! Structured action extraction.
//!
//! Derives UI-renderable next steps deterministically from the business
//! context. The generated response text is never mined; every action comes
//! from a fixed rule over real numbers, so the same context always yields
//! the same actions (ids and timestamps aside).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bazarify_core::{ProductId, Taka};

use crate::context::BusinessContext;
use crate::registry::PriorityLabel;

/// Restock target for a product that ran out.
const RESTOCK_FLOOR: i64 = 20;

/// Stock above this with no recent sales suggests a price problem.
const OVERSTOCK_THRESHOLD: i64 = 50;

/// Suggested discount for overstocked slow movers, in percent.
const SLOW_MOVER_DISCOUNT_PCT: u8 = 10;

/// At most this many low-stock restock actions per response.
const LOW_STOCK_ACTION_LIMIT: usize = 5;

/// At most this many price-adjustment actions per response.
const PRICE_ACTION_LIMIT: usize = 3;

/// At most this many promotion actions per response.
const PROMOTE_ACTION_LIMIT: usize = 3;

/// Weekly revenue below this triggers the marketing action.
const MARKETING_REVENUE_FLOOR: i64 = 5000;

/// Suggested starting marketing budget.
const MARKETING_BUDGET: i64 = 1000;

/// Customer count above which engagement is considered.
const ENGAGEMENT_CUSTOMER_FLOOR: usize = 10;

/// Order count needed before the delivery rate is judged.
const DELIVERY_MIN_ORDERS: usize = 10;

/// Delivery rate below this percentage triggers the delivery action.
const DELIVERY_RATE_FLOOR_PCT: f64 = 70.0;

/// Total revenue above which inventory expansion is suggested.
const EXPANSION_REVENUE_FLOOR: i64 = 50_000;

/// Product count below which expansion is suggested.
const EXPANSION_PRODUCT_CEILING: usize = 30;

/// How urgently an action should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Soon,
    Normal,
}

impl Urgency {
    /// Numeric rank for ordering. Lower sorts first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Urgent => 1,
            Self::Soon => 2,
            Self::Normal => 3,
        }
    }
}

/// What the action does and on what, as one closed type per rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDetail {
    IncreaseStock {
        product_id: ProductId,
        product_name: String,
        current_stock: i64,
        suggested_stock: i64,
    },
    AdjustPrice {
        product_id: ProductId,
        product_name: String,
        current_price: Taka,
        suggested_price: Taka,
        discount_pct: u8,
    },
    PromoteProduct {
        product_id: ProductId,
        product_name: String,
        sales_count: i64,
    },
    StartMarketing {
        channels: Vec<String>,
        budget: Taka,
    },
    EngageCustomers {
        customer_count: usize,
        offer_type: String,
    },
    ImproveDelivery {
        pending_orders: usize,
        current_rate_pct: i64,
        target_rate_pct: i64,
    },
    ExpandInventory {
        current_products: usize,
        suggested_products: usize,
        categories: Vec<String>,
    },
}

/// One recommended next step, ready for UI rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    #[serde(flatten)]
    pub detail: ActionDetail,
    pub reason: String,
    pub priority: PriorityLabel,
    pub urgency: Urgency,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
}

struct PendingAction {
    detail: ActionDetail,
    reason: String,
    priority: PriorityLabel,
    urgency: Urgency,
}

/// Extract structured actions from the business context, most important
/// first.
///
/// Sorting is by priority then urgency, and the sort is stable, so actions
/// of equal rank keep rule order. Ids are `action_<millis>_<index>` with
/// the index taken after sorting.
#[must_use]
pub fn extract(ctx: &BusinessContext, now: DateTime<Utc>) -> Vec<Action> {
    let mut pending: Vec<PendingAction> = Vec::new();

    restock_out_of_stock(ctx, &mut pending);
    restock_low_stock(ctx, &mut pending);
    discount_slow_movers(ctx, &mut pending);
    promote_top_sellers(ctx, &mut pending);
    start_marketing(ctx, &mut pending);
    engage_customers(ctx, &mut pending);
    improve_delivery(ctx, &mut pending);
    expand_inventory(ctx, &mut pending);

    pending.sort_by_key(|a| (std::cmp::Reverse(a.priority.rank()), a.urgency.rank()));

    let millis = now.timestamp_millis();
    pending
        .into_iter()
        .enumerate()
        .map(|(index, action)| Action {
            id: format!("action_{millis}_{index}"),
            detail: action.detail,
            reason: action.reason,
            priority: action.priority,
            urgency: action.urgency,
            created_at: now,
            completed: false,
        })
        .collect()
}

/// Like [`extract`] with the current wall clock.
#[instrument(skip(ctx), fields(total_products = ctx.total_products, total_orders = ctx.total_orders))]
#[must_use]
pub fn extract_now(ctx: &BusinessContext) -> Vec<Action> {
    extract(ctx, Utc::now())
}

fn restock_out_of_stock(ctx: &BusinessContext, pending: &mut Vec<PendingAction>) {
    for product in &ctx.out_of_stock_products {
        pending.push(PendingAction {
            detail: ActionDetail::IncreaseStock {
                product_id: product.id,
                product_name: product.name.clone(),
                current_stock: product.stock,
                suggested_stock: RESTOCK_FLOOR,
            },
            reason: format!(
                "\"{}\" সম্পূর্ণ শেষ। গ্রাহকরা অর্ডার করতে পারছেন না।",
                product.name
            ),
            priority: PriorityLabel::High,
            urgency: Urgency::Urgent,
        });
    }
}

fn restock_low_stock(ctx: &BusinessContext, pending: &mut Vec<PendingAction>) {
    for product in ctx.low_stock_products.iter().take(LOW_STOCK_ACTION_LIMIT) {
        pending.push(PendingAction {
            detail: ActionDetail::IncreaseStock {
                product_id: product.id,
                product_name: product.name.clone(),
                current_stock: product.stock,
                suggested_stock: RESTOCK_FLOOR.max(product.stock.saturating_mul(3)),
            },
            reason: format!(
                "\"{}\" এর স্টক কম ({}টি)। শীঘ্রই শেষ হয়ে যাবে।",
                product.name, product.stock
            ),
            priority: PriorityLabel::Medium,
            urgency: Urgency::Soon,
        });
    }
}

fn discount_slow_movers(ctx: &BusinessContext, pending: &mut Vec<PendingAction>) {
    if !ctx.has_products {
        return;
    }

    let recently_sold = |product_id: ProductId| {
        ctx.recent_orders
            .iter()
            .any(|order| order.items.iter().any(|item| item.product_id == product_id))
    };

    let slow_movers = ctx
        .products
        .iter()
        .filter(|p| p.stock > OVERSTOCK_THRESHOLD && !recently_sold(p.id))
        .take(PRICE_ACTION_LIMIT);

    let keep_ratio = Decimal::from(100 - i64::from(SLOW_MOVER_DISCOUNT_PCT)) / Decimal::from(100);
    for product in slow_movers {
        pending.push(PendingAction {
            detail: ActionDetail::AdjustPrice {
                product_id: product.id,
                product_name: product.name.clone(),
                current_price: product.price,
                suggested_price: product.price * keep_ratio,
                discount_pct: SLOW_MOVER_DISCOUNT_PCT,
            },
            reason: format!(
                "\"{}\" এর অনেক স্টক আছে ({}টি) কিন্তু বিক্রয় হচ্ছে না। {}% ছাড় দিলে বিক্রয় বাড়বে।",
                product.name, product.stock, SLOW_MOVER_DISCOUNT_PCT
            ),
            priority: PriorityLabel::Medium,
            urgency: Urgency::Normal,
        });
    }
}

fn promote_top_sellers(ctx: &BusinessContext, pending: &mut Vec<PendingAction>) {
    if !ctx.has_sales_data || ctx.recent_orders.is_empty() {
        return;
    }

    // Tally recent sales per product
    let mut sales: Vec<(ProductId, i64)> = Vec::new();
    for order in &ctx.recent_orders {
        for item in &order.items {
            if item.quantity <= 0 {
                continue;
            }
            match sales.iter_mut().find(|(id, _)| *id == item.product_id) {
                Some((_, count)) => *count += item.quantity,
                None => sales.push((item.product_id, item.quantity)),
            }
        }
    }

    // Highest sales first; ties break on product id for determinism
    sales.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sales.truncate(PROMOTE_ACTION_LIMIT);

    for (product_id, sales_count) in sales {
        let Some(product) = ctx.products.iter().find(|p| p.id == product_id) else {
            continue;
        };
        pending.push(PendingAction {
            detail: ActionDetail::PromoteProduct {
                product_id,
                product_name: product.name.clone(),
                sales_count,
            },
            reason: format!(
                "\"{}\" সবচেয়ে বেশি বিক্রি হয়েছে ({sales_count} বার)। আরো প্রচার করলে বিক্রয় আরো বাড়বে।",
                product.name
            ),
            priority: PriorityLabel::High,
            urgency: Urgency::Normal,
        });
    }
}

fn start_marketing(ctx: &BusinessContext, pending: &mut Vec<PendingAction>) {
    if ctx.has_sales_data && ctx.weekly_revenue >= Taka::from_major(MARKETING_REVENUE_FLOOR) {
        return;
    }

    let reason = if ctx.has_sales_data {
        format!(
            "গত সপ্তাহে মাত্র ৳{} বিক্রয় হয়েছে। মার্কেটিং বাড়ালে বিক্রয় বাড়বে।",
            ctx.weekly_revenue.rounded_whole()
        )
    } else {
        "গত ৭ দিনে কোনো বিক্রয় নেই। সোশ্যাল মিডিয়ায় প্রচার শুরু করুন।".to_string()
    };

    pending.push(PendingAction {
        detail: ActionDetail::StartMarketing {
            channels: vec![
                "facebook".to_string(),
                "instagram".to_string(),
                "whatsapp".to_string(),
            ],
            budget: Taka::from_major(MARKETING_BUDGET),
        },
        reason,
        priority: PriorityLabel::High,
        urgency: Urgency::Urgent,
    });
}

fn engage_customers(ctx: &BusinessContext, pending: &mut Vec<PendingAction>) {
    if ctx.total_customers > ENGAGEMENT_CUSTOMER_FLOOR
        && ctx.total_orders < ctx.total_customers * 2
    {
        pending.push(PendingAction {
            detail: ActionDetail::EngageCustomers {
                customer_count: ctx.total_customers,
                offer_type: "loyalty_discount".to_string(),
            },
            reason: format!(
                "{} জন গ্রাহক আছেন কিন্তু রিপিট অর্ডার কম। লয়ালটি অফার দিলে তারা আবার কিনবেন।",
                ctx.total_customers
            ),
            priority: PriorityLabel::Medium,
            urgency: Urgency::Normal,
        });
    }
}

#[allow(clippy::cast_possible_truncation)]
fn improve_delivery(ctx: &BusinessContext, pending: &mut Vec<PendingAction>) {
    if ctx.total_orders <= DELIVERY_MIN_ORDERS {
        return;
    }

    let rate_pct = ctx.delivery_rate() * 100.0;
    if rate_pct < DELIVERY_RATE_FLOOR_PCT {
        let pending_orders = ctx.orders_by_status.pending;
        pending.push(PendingAction {
            detail: ActionDetail::ImproveDelivery {
                pending_orders,
                current_rate_pct: rate_pct.round() as i64,
                target_rate_pct: 90,
            },
            reason: format!(
                "ডেলিভারি হার মাত্র {}%। {pending_orders}টি অর্ডার অপেক্ষমাণ। দ্রুত ডেলিভার করুন।",
                rate_pct.round() as i64
            ),
            priority: PriorityLabel::High,
            urgency: Urgency::Urgent,
        });
    }
}

fn expand_inventory(ctx: &BusinessContext, pending: &mut Vec<PendingAction>) {
    if ctx.total_revenue > Taka::from_major(EXPANSION_REVENUE_FLOOR)
        && ctx.total_products < EXPANSION_PRODUCT_CEILING
    {
        pending.push(PendingAction {
            detail: ActionDetail::ExpandInventory {
                current_products: ctx.total_products,
                suggested_products: 50,
                categories: ctx.categories.clone(),
            },
            reason: format!(
                "আপনার ব্যবসা ভালো চলছে (৳{} বিক্রয়)। নতুন পণ্য যোগ করলে আরো বেশি বিক্রয় হবে।",
                ctx.total_revenue.rounded_whole()
            ),
            priority: PriorityLabel::Low,
            urgency: Urgency::Normal,
        });
    }
}
