//! Demo shop data for trying the advisor without a real store.
//!
//! Models a small Dhaka grocery ("করিম ফ্রেশ মার্ট") with a mix of healthy,
//! low, and exhausted stock plus a week of orders, so every advisory tool
//! has something to say.

use chrono::{Duration, Utc};

use bazarify_advisor::InMemoryStore;
use bazarify_core::{
    Customer, CustomerId, Order, OrderId, OrderItem, OrderStatus, Product, ProductId, ShopId, Taka,
};

/// The demo shop's id.
pub const DEMO_SHOP: ShopId = ShopId::new(1);

fn product(id: i64, name: &str, category: &str, price: i64, stock: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: Some(category.to_string()),
        price: Taka::from_major(price),
        stock,
    }
}

/// Build the demo store.
#[must_use]
pub fn demo_store() -> InMemoryStore {
    let products = vec![
        product(1, "আলু (প্রতি কেজি)", "সবজি", 35, 500),
        product(2, "টমেটো (প্রতি কেজি)", "সবজি", 60, 300),
        product(3, "পেঁয়াজ (প্রতি কেজি)", "সবজি", 45, 8),
        product(4, "গাজর (প্রতি কেজি)", "সবজি", 80, 200),
        product(5, "আম (প্রতি কেজি)", "ফল", 120, 0),
        product(6, "কলা (প্রতি ডজন)", "ফল", 90, 5),
        product(7, "হলুদ গুঁড়া (২০০ গ্রাম)", "মসলা", 85, 150),
        product(8, "গরুর দুধ (১ লিটার)", "দুগ্ধজাত", 95, 0),
        product(9, "চাল (প্রতি কেজি)", "মুদি", 75, 600),
        product(10, "সয়াবিন তেল (১ লিটার)", "মুদি", 165, 45),
    ];

    let now = Utc::now();
    let mut orders = Vec::new();
    // A week of delivered orders, heaviest on rice and potatoes
    for day in 0..6_i64 {
        orders.push(Order {
            id: OrderId::new(day + 1),
            total_amount: Taka::from_major(450 + day * 120),
            status: OrderStatus::Delivered,
            created_at: Some(now - Duration::days(day)),
            items: vec![
                OrderItem {
                    product_id: ProductId::new(9),
                    quantity: 3,
                },
                OrderItem {
                    product_id: ProductId::new(1),
                    quantity: 2,
                },
            ],
        });
    }
    orders.push(Order {
        id: OrderId::new(7),
        total_amount: Taka::from_major(780),
        status: OrderStatus::Pending,
        created_at: Some(now - Duration::days(1)),
        items: vec![OrderItem {
            product_id: ProductId::new(2),
            quantity: 4,
        }],
    });
    orders.push(Order {
        id: OrderId::new(8),
        total_amount: Taka::from_major(320),
        status: OrderStatus::Cancelled,
        created_at: Some(now - Duration::days(20)),
        items: vec![],
    });

    let customers = vec![
        Customer {
            id: CustomerId::new(1),
            name: "রহিমা বেগম".to_string(),
        },
        Customer {
            id: CustomerId::new(2),
            name: "জামাল হোসেন".to_string(),
        },
        Customer {
            id: CustomerId::new(3),
            name: "শফিক আহমেদ".to_string(),
        },
    ];

    InMemoryStore::for_shop(DEMO_SHOP, products, orders, customers)
}
