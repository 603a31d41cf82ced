//! The standard advisory tool catalog.
//!
//! Seven capabilities, registered in a fixed order so that equal-priority
//! selections are deterministic. Keywords mix Bangla and English because
//! shop owners type both, often in the same sentence.

use crate::context::BusinessContext;

use super::{Priority, PriorityLabel, RegistryError, Tool, ToolRegistry, ToolRun};

fn gate_has_business_data(ctx: &BusinessContext, _query: &str) -> bool {
    ctx.has_orders || ctx.has_products
}

fn gate_has_sales_data(ctx: &BusinessContext, _query: &str) -> bool {
    ctx.has_sales_data && !ctx.sales_data.is_empty()
}

fn gate_has_products(ctx: &BusinessContext, _query: &str) -> bool {
    ctx.has_products
}

fn gate_has_orders(ctx: &BusinessContext, _query: &str) -> bool {
    ctx.has_orders && !ctx.orders.is_empty()
}

// The query arrives lowercased, so plain `contains` suffices for the
// English keywords and Bangla has no case to fold.
fn gate_asks_for_description(_ctx: &BusinessContext, query: &str) -> bool {
    ["বর্ণনা", "description", "লিখ", "write"]
        .iter()
        .any(|kw| query.contains(kw))
}

fn gate_asks_for_message(_ctx: &BusinessContext, query: &str) -> bool {
    ["বার্তা", "message", "sms", "পাঠা", "send"]
        .iter()
        .any(|kw| query.contains(kw))
}

fn inventory_priority(ctx: &BusinessContext) -> PriorityLabel {
    if ctx.has_low_stock || ctx.has_out_of_stock {
        PriorityLabel::High
    } else {
        PriorityLabel::Medium
    }
}

fn reason_business_insights(_ctx: &BusinessContext) -> String {
    "ব্যবসায়িক বিশ্লেষণ প্রয়োজন".to_string()
}

fn reason_sales_trend(_ctx: &BusinessContext) -> String {
    "বিক্রয় প্রবণতা বিশ্লেষণ প্রয়োজন".to_string()
}

fn reason_inventory(ctx: &BusinessContext) -> String {
    if ctx.has_low_stock || ctx.has_out_of_stock {
        "জরুরি: স্টক সমস্যা সনাক্ত".to_string()
    } else {
        "ইনভেন্টরি পরামর্শ প্রয়োজন".to_string()
    }
}

fn reason_order_report(_ctx: &BusinessContext) -> String {
    "অর্ডার রিপোর্ট তৈরির অনুরোধ".to_string()
}

fn reason_product_description(_ctx: &BusinessContext) -> String {
    "পণ্যের বর্ণনা তৈরির অনুরোধ".to_string()
}

fn reason_customer_message(_ctx: &BusinessContext) -> String {
    "গ্রাহক বার্তা তৈরির অনুরোধ".to_string()
}

fn reason_chat(_ctx: &BusinessContext) -> String {
    "সাধারণ ব্যবসায়িক পরামর্শ".to_string()
}

/// Build the standard registry with all seven advisory tools.
///
/// # Errors
///
/// Returns an error if any tool definition is invalid. With the fixed
/// catalog below this only fires if a definition is edited incorrectly.
pub fn standard_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();

    registry.register(
        Tool::builder("business_insights", "ব্যবসা বিশ্লেষণ", ToolRun::BusinessInsights)
            .icon("📊")
            .description("ব্যবসায়িক তথ্যের উপর ভিত্তি করে পরামর্শ এবং অন্তর্দৃষ্টি প্রদান করে")
            .keywords(&[
                "বিক্রয়", "sales", "ব্যবসা", "business", "বিশ্লেষণ", "analysis", "অবস্থা",
                "status", "কেমন", "how",
            ])
            .gate(gate_has_business_data)
            .priority(Priority::Static(PriorityLabel::Medium))
            .reason(reason_business_insights)
            .build()?,
    )?;

    registry.register(
        Tool::builder("sales_trend", "বিক্রয় ট্রেন্ড", ToolRun::SalesTrend)
            .icon("📈")
            .description("বিক্রয় প্রবণতা বিশ্লেষণ করে এবং পূর্বাভাস প্রদান করে")
            .keywords(&[
                "ট্রেন্ড", "trend", "প্রবণতা", "পূর্বাভাস", "forecast", "ভবিষ্যত", "future",
                "গত", "last", "সপ্তাহ", "week", "দিন", "day",
            ])
            .gate(gate_has_sales_data)
            .priority(Priority::Static(PriorityLabel::Medium))
            .reason(reason_sales_trend)
            .build()?,
    )?;

    registry.register(
        Tool::builder("inventory_advice", "ইনভেন্টরি পরামর্শ", ToolRun::InventoryAdvice)
            .icon("📦")
            .description("ইনভেন্টরি ব্যবস্থাপনার জন্য স্মার্ট পরামর্শ প্রদান করে")
            .keywords(&[
                "স্টক", "stock", "ইনভেন্টরি", "inventory", "কম", "low", "শেষ", "finish",
                "পণ্য", "product",
            ])
            .gate(gate_has_products)
            .priority(Priority::Dynamic(inventory_priority))
            .reason(reason_inventory)
            .build()?,
    )?;

    registry.register(
        Tool::builder("order_report", "অর্ডার রিপোর্ট", ToolRun::OrderReport)
            .icon("📋")
            .description("অর্ডারের বিস্তারিত রিপোর্ট তৈরি করে")
            .keywords(&[
                "রিপোর্ট", "report", "প্রতিবেদন", "অর্ডার", "order", "মাস", "month",
                "সপ্তাহ", "week",
            ])
            .gate(gate_has_orders)
            .priority(Priority::Static(PriorityLabel::Low))
            .reason(reason_order_report)
            .build()?,
    )?;

    registry.register(
        Tool::builder("product_description", "পণ্য বর্ণনা", ToolRun::ProductDescription)
            .icon("📝")
            .description("পণ্যের জন্য আকর্ষণীয় বাংলা বর্ণনা তৈরি করে")
            .keywords(&[
                "পণ্য", "product", "বর্ণনা", "description", "লিখ", "write", "তৈরি", "create",
            ])
            .gate(gate_asks_for_description)
            .priority(Priority::Static(PriorityLabel::Medium))
            .reason(reason_product_description)
            .requires_params()
            .build()?,
    )?;

    registry.register(
        Tool::builder("customer_message", "গ্রাহক বার্তা", ToolRun::CustomerMessage)
            .icon("💬")
            .description("গ্রাহকদের জন্য পেশাদার SMS/বার্তা তৈরি করে")
            .keywords(&[
                "গ্রাহক", "customer", "বার্তা", "message", "sms", "পাঠা", "send",
                "reminder", "রিমাইন্ডার",
            ])
            .gate(gate_asks_for_message)
            .priority(Priority::Static(PriorityLabel::Low))
            .reason(reason_customer_message)
            .requires_params()
            .build()?,
    )?;

    registry.register(
        Tool::builder("chat_assistant", "AI চ্যাট", ToolRun::ChatAssistant)
            .icon("💭")
            .description("সাধারণ ব্যবসায়িক প্রশ্নের উত্তর দেয়")
            .priority(Priority::Static(PriorityLabel::Low))
            .reason(reason_chat)
            .fallback()
            .build()?,
    )?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazarify_core::{Product, ProductId, Taka};

    fn shop_with_stock_trouble() -> BusinessContext {
        BusinessContext {
            has_products: true,
            has_orders: true,
            has_out_of_stock: true,
            total_products: 3,
            products: vec![Product {
                id: ProductId::new(1),
                name: "চাল".to_string(),
                category: None,
                price: Taka::from_major(60),
                stock: 0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_catalog_registers_seven_tools() {
        let registry = standard_registry().expect("valid catalog");
        assert_eq!(registry.all().count(), 7);
        assert_eq!(registry.fallback().map(|t| t.id), Some("chat_assistant"));
    }

    #[test]
    fn test_param_gated_tools_marked() {
        let registry = standard_registry().expect("valid catalog");
        assert!(registry.requires_params("product_description"));
        assert!(registry.requires_params("customer_message"));
        assert!(!registry.requires_params("business_insights"));
    }

    #[test]
    fn test_stock_trouble_raises_inventory_priority() {
        let registry = standard_registry().expect("valid catalog");
        let ctx = shop_with_stock_trouble();

        let ranked = registry.find_relevant_tools("স্টক কেমন আছে", &ctx);
        let first = ranked.first().expect("inventory matched");
        assert_eq!(first.tool_id, "inventory_advice");
        assert_eq!(first.priority, PriorityLabel::High);
        assert_eq!(first.reason, "জরুরি: স্টক সমস্যা সনাক্ত");
    }

    #[test]
    fn test_description_tool_requires_query_intent() {
        let registry = standard_registry().expect("valid catalog");
        let ctx = shop_with_stock_trouble();

        // "পণ্য" is a keyword of the tool, but the gate insists the query
        // actually asks for a description.
        let without_intent = registry.find_relevant_tools("পণ্য কয়টা আছে", &ctx);
        assert!(!without_intent.iter().any(|t| t.tool_id == "product_description"));

        let with_intent = registry.find_relevant_tools("পণ্যের বর্ণনা লিখে দাও", &ctx);
        assert!(with_intent.iter().any(|t| t.tool_id == "product_description"));
    }

    #[test]
    fn test_empty_shop_matches_nothing() {
        let registry = standard_registry().expect("valid catalog");
        let ctx = BusinessContext::default();
        let ranked = registry.find_relevant_tools("আমার ব্যবসার অবস্থা কেমন", &ctx);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_sales_trend_gated_on_series() {
        let registry = standard_registry().expect("valid catalog");
        let ctx = BusinessContext {
            has_orders: true,
            has_products: true,
            ..Default::default()
        };
        let ranked = registry.find_relevant_tools("গত সপ্তাহের ট্রেন্ড", &ctx);
        assert!(!ranked.iter().any(|t| t.tool_id == "sales_trend"));
    }
}
