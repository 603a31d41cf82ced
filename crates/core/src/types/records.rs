//! Business record structs as fetched from the record store.
//!
//! These are deliberately plain data carriers. The advisor's context builder
//! is the validation boundary: it clamps negative numbers, skips orders with
//! missing timestamps, and tolerates absent categories, so records can be
//! passed through from any backing store without pre-cleaning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, OrderId, ProductId};
use super::money::Taka;
use super::status::OrderStatus;

/// A product in the shop catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Product category; absent or empty categories are skipped when
    /// building the deduplicated category list.
    #[serde(default)]
    pub category: Option<String>,
    pub price: Taka,
    /// Units in stock. May be negative in a corrupted store; consumers
    /// clamp to zero.
    pub stock: i64,
}

/// A single line item within an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub total_amount: Taka,
    pub status: OrderStatus,
    /// Creation timestamp. `None` models a malformed or missing stored
    /// timestamp; such orders are excluded from time-windowed aggregates
    /// but still count toward totals.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A shop customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserializes_without_optional_fields() {
        let json = r#"{"id":1,"total_amount":"500","status":"pending"}"#;
        let order: Order = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.id, OrderId::new(1));
        assert!(order.created_at.is_none());
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_product_without_category() {
        let json = r#"{"id":1,"name":"চাল","price":"120","stock":5}"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert!(product.category.is_none());
    }
}
