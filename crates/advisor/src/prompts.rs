//! Per-capability prompt builders for the advisory tools.
//!
//! Each advisory capability sends its own small conversation to the
//! completion gateway: an English system persona naming the specialty and a
//! Bangla user prompt carrying the relevant slice of business data. The
//! builders here are pure - they format messages, nothing else.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use bazarify_core::Taka;

use crate::context::{BusinessContext, SalesDay};
use crate::gateway::ChatMessage;

/// Parameters for generating a product description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDescriptionParams {
    pub product_name: String,
    pub category: String,
    #[serde(default)]
    pub price: Taka,
    #[serde(default)]
    pub features: Vec<String>,
}

/// The kind of customer message to generate, with its context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomerMessageKind {
    OrderConfirmation { order_number: String, total: Taka },
    PaymentReminder { amount: Taka },
    Promotional { offer: String },
}

/// Parameters for generating a customer SMS/message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMessageParams {
    pub customer_name: String,
    #[serde(flatten)]
    pub kind: CustomerMessageKind,
}

/// Prompt for business insights from headline stats.
#[must_use]
pub fn business_insights(ctx: &BusinessContext) -> Vec<ChatMessage> {
    let user = format!(
        "ব্যবসায়িক তথ্য:\n\
         - মোট বিক্রয়: {}\n\
         - মোট অর্ডার: {}\n\
         - মোট পণ্য: {}\n\
         - মোট গ্রাহক: {}\n\
         - গড় অর্ডার মূল্য: {}\n\n\
         এই তথ্যের উপর ভিত্তি করে ৩-৫টি ব্যবসায়িক পরামর্শ এবং অন্তর্দৃষ্টি প্রদান করুন (বাংলায়)।",
        ctx.total_revenue,
        ctx.total_orders,
        ctx.total_products,
        ctx.total_customers,
        ctx.average_order_value,
    );

    vec![
        ChatMessage::system(
            "You are a business analyst for Bangladeshi SMEs. \
             Provide actionable insights in Bangla based on business data.",
        ),
        ChatMessage::user(user),
    ]
}

/// Prompt for trend analysis over the recent daily sales series.
#[must_use]
pub fn sales_trend(sales_data: &[SalesDay]) -> Vec<ChatMessage> {
    let mut series = String::new();
    for (i, day) in sales_data.iter().enumerate() {
        let _ = writeln!(series, "দিন {}: {}, অর্ডার: {}", i + 1, day.amount, day.count);
    }

    let user = format!(
        "বিক্রয় তথ্য (গত ৭ দিন):\n{series}\n\
         এই তথ্যের উপর ভিত্তি করে:\n\
         1. বিক্রয় প্রবণতা বিশ্লেষণ করুন\n\
         2. পরবর্তী সপ্তাহের পূর্বাভাস দিন\n\
         3. উন্নতির জন্য পরামর্শ দিন\n\n\
         উত্তর বাংলায় প্রদান করুন।"
    );

    vec![
        ChatMessage::system(
            "You are a data analyst specializing in Bangladeshi SME sales patterns. \
             Analyze trends and provide predictions in Bangla.",
        ),
        ChatMessage::user(user),
    ]
}

/// Prompt for inventory recommendations from the stock partitions.
#[must_use]
pub fn inventory_advice(ctx: &BusinessContext) -> Vec<ChatMessage> {
    let mut user = format!(
        "ইনভেন্টরি পরিস্থিতি:\n\
         - মোট পণ্য: {}\n\
         - কম স্টক (১০-এর নিচে): {}টি\n\
         - স্টক শেষ: {}টি\n",
        ctx.total_products,
        ctx.low_stock_products.len(),
        ctx.out_of_stock_products.len(),
    );

    if !ctx.low_stock_products.is_empty() {
        let names: Vec<&str> = ctx.low_stock_products.iter().map(|p| p.name.as_str()).collect();
        let _ = write!(user, "\nকম স্টক পণ্য: {}", names.join(", "));
    }
    if !ctx.out_of_stock_products.is_empty() {
        let names: Vec<&str> = ctx
            .out_of_stock_products
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let _ = write!(user, "\nস্টক শেষ পণ্য: {}", names.join(", "));
    }
    user.push_str("\n\nইনভেন্টরি ব্যবস্থাপনার জন্য পরামর্শ এবং সতর্কতা প্রদান করুন (বাংলায়)।");

    vec![
        ChatMessage::system(
            "You are an inventory management expert for Bangladeshi SMEs. \
             Provide practical advice in Bangla.",
        ),
        ChatMessage::user(user),
    ]
}

/// Prompt for a detailed order report over the shop's orders.
#[must_use]
pub fn order_report(ctx: &BusinessContext, period: &str) -> Vec<ChatMessage> {
    let user = format!(
        "অর্ডার রিপোর্ট ({period}):\n\
         - মোট অর্ডার: {}টি\n\
         - মোট আয়: {}\n\
         - গড় অর্ডার মূল্য: {}\n\
         - সফল অর্ডার: {}টি\n\
         - বাতিল অর্ডার: {}টি\n\
         - পেন্ডিং অর্ডার: {}টি\n\n\
         এই তথ্যের উপর ভিত্তি করে একটি বিস্তারিত রিপোর্ট তৈরি করুন যাতে থাকবে:\n\
         1. পারফরম্যান্স সারাংশ\n\
         2. মূল অন্তর্দৃষ্টি\n\
         3. উন্নতির সুযোগ\n\
         4. পরবর্তী পদক্ষেপের পরামর্শ\n\n\
         বাংলায় প্রদান করুন।",
        ctx.total_orders,
        ctx.total_revenue,
        ctx.average_order_value,
        ctx.orders_by_status.delivered,
        ctx.orders_by_status.cancelled,
        ctx.orders_by_status.pending,
    );

    vec![
        ChatMessage::system(
            "You are a business report writer for Bangladeshi SMEs. \
             Generate comprehensive reports in Bangla.",
        ),
        ChatMessage::user(user),
    ]
}

/// Prompt for a persuasive product description.
#[must_use]
pub fn product_description(params: &ProductDescriptionParams) -> Vec<ChatMessage> {
    let mut user = format!(
        "পণ্যের নাম: {}\nক্যাটাগরি: {}\nমূল্য: {}\n",
        params.product_name, params.category, params.price,
    );
    if !params.features.is_empty() {
        let _ = writeln!(user, "বৈশিষ্ট্য: {}", params.features.join(", "));
    }
    user.push_str("\nএই পণ্যের জন্য একটি আকর্ষণীয় এবং বিক্রয়োপযোগী বাংলা বর্ণনা তৈরি করুন (৩-৫ লাইন)।");

    vec![
        ChatMessage::system(
            "You are a helpful assistant for Bangladeshi SME businesses. \
             Generate product descriptions in Bangla language that are persuasive and SEO-friendly.",
        ),
        ChatMessage::user(user),
    ]
}

/// Prompt for a customer SMS/message of the given kind.
#[must_use]
pub fn customer_message(params: &CustomerMessageParams) -> Vec<ChatMessage> {
    let name = &params.customer_name;
    let user = match &params.kind {
        CustomerMessageKind::OrderConfirmation { order_number, total } => format!(
            "{name} নামের গ্রাহকের জন্য অর্ডার নিশ্চিতকরণ SMS তৈরি করুন। \
             অর্ডার নম্বর: {order_number}, মোট: {total}। \
             বার্তাটি সংক্ষিপ্ত (১৬০ অক্ষরের মধ্যে) এবং বন্ধুত্বপূর্ণ হতে হবে।"
        ),
        CustomerMessageKind::PaymentReminder { amount } => format!(
            "{name} নামের গ্রাহকের জন্য পেমেন্ট রিমাইন্ডার SMS তৈরি করুন। বকেয়া: {amount}। \
             বার্তাটি ভদ্র এবং পেশাদার হতে হবে (১৬০ অক্ষরের মধ্যে)।"
        ),
        CustomerMessageKind::Promotional { offer } => format!(
            "{name} নামের গ্রাহকের জন্য প্রচারমূলক SMS তৈরি করুন। অফার: {offer}। \
             বার্তাটি আকর্ষণীয় এবং সংক্ষিপ্ত হতে হবে (১৬০ অক্ষরের মধ্যে)।"
        ),
    };

    vec![
        ChatMessage::system(
            "You are a marketing expert for Bangladeshi businesses. \
             Generate customer messages in Bangla that are professional, friendly, and effective.",
        ),
        ChatMessage::user(user),
    ]
}

/// Prompt for the general-purpose chat assistant, with prior turns.
#[must_use]
pub fn chat(user_message: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(
        "You are \"AI মুন্সিজি - আপনার ব্যবসার সহযোগী\" (AI Munshiji - Your Business Partner), \
         an AI helper for Bangladeshi SME business owners. You help with:\n\
         - ব্যবসায়িক পরামর্শ (Business advice)\n\
         - পণ্য ব্যবস্থাপনা (Product management)\n\
         - গ্রাহক সেবা (Customer service)\n\
         - বিক্রয় কৌশল (Sales strategies)\n\
         - আর্থিক পরিকল্পনা (Financial planning)\n\n\
         Always respond in Bangla, be helpful, professional, and provide actionable advice \
         for small business owners in Bangladesh.",
    ));
    messages.extend_from_slice(history);
    messages.push(ChatMessage::user(user_message));
    messages
}
