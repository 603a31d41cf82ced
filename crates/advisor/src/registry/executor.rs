//! Tool execution against the completion gateway.
//!
//! The executor is the single place where a [`ToolRun`] variant is turned
//! into prompt messages and a gateway call. Guards for missing data and
//! missing parameters resolve to fixed Bangla strings without touching the
//! gateway at all.

use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::{error, instrument};

use crate::context::BusinessContext;
use crate::gateway::{CompletionGateway, CompletionOptions, GatewayError};
use crate::prompts::{self, CustomerMessageParams, ProductDescriptionParams};

use super::{ToolRegistry, ToolRun};

/// Period label used for whole-history order reports.
const ALL_TIME_PERIOD: &str = "সব সময়";

/// Sampling temperature for customer-facing message generation. Slightly
/// warmer than the 0.7 used everywhere else.
const CUSTOMER_MESSAGE_TEMPERATURE: f32 = 0.8;

/// Caller-supplied parameters accompanying a request.
///
/// `user_message` and `history` are always present; the rest gate the
/// parameterized tools. A param-gated tool that runs without its params
/// returns guidance on what to supply instead of calling the gateway.
#[derive(Debug, Clone, Default)]
pub struct ToolParams {
    /// The raw user query, passed through to the chat assistant.
    pub user_message: String,
    /// Prior conversation turns, oldest first.
    pub history: Vec<crate::gateway::ChatMessage>,
    /// Parameters for `product_description`.
    pub product: Option<ProductDescriptionParams>,
    /// Parameters for `customer_message`.
    pub customer: Option<CustomerMessageParams>,
}

impl ToolParams {
    /// Params carrying just the user's message.
    #[must_use]
    pub fn from_message(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            ..Default::default()
        }
    }
}

/// Executes tools against a completion gateway.
pub struct ToolExecutor<'a, G> {
    gateway: &'a G,
}

impl<'a, G: CompletionGateway> ToolExecutor<'a, G> {
    /// Create an executor over the given gateway.
    #[must_use]
    pub const fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Execute a single run path.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the completion call fails. Data and
    /// parameter guards do not error; they return fixed Bangla strings.
    pub async fn execute(
        &self,
        run: ToolRun,
        ctx: &BusinessContext,
        params: &ToolParams,
    ) -> Result<String, GatewayError> {
        let options = CompletionOptions::default();
        match run {
            ToolRun::BusinessInsights => {
                self.gateway
                    .complete(prompts::business_insights(ctx), options)
                    .await
            }
            ToolRun::SalesTrend => {
                if ctx.sales_data.is_empty() {
                    return Ok("গত ৭ দিনে পর্যাপ্ত বিক্রয় তথ্য নেই।".to_string());
                }
                self.gateway
                    .complete(prompts::sales_trend(&ctx.sales_data), options)
                    .await
            }
            ToolRun::InventoryAdvice => {
                if ctx.products.is_empty() {
                    return Ok("এখনও কোনো পণ্য যোগ করা হয়নি।".to_string());
                }
                self.gateway
                    .complete(prompts::inventory_advice(ctx), options)
                    .await
            }
            ToolRun::OrderReport => {
                if ctx.orders.is_empty() {
                    return Ok("এখনও কোনো অর্ডার নেই।".to_string());
                }
                self.gateway
                    .complete(prompts::order_report(ctx, ALL_TIME_PERIOD), options)
                    .await
            }
            ToolRun::ProductDescription => match &params.product {
                Some(product) => {
                    self.gateway
                        .complete(prompts::product_description(product), options)
                        .await
                }
                None => Ok(
                    "পণ্যের বর্ণনা তৈরি করতে, অনুগ্রহ করে পণ্যের নাম, ক্যাটাগরি এবং মূল্য উল্লেখ করুন।"
                        .to_string(),
                ),
            },
            ToolRun::CustomerMessage => match &params.customer {
                Some(customer) => {
                    self.gateway
                        .complete(
                            prompts::customer_message(customer),
                            CompletionOptions::with_temperature(CUSTOMER_MESSAGE_TEMPERATURE),
                        )
                        .await
                }
                None => Ok(
                    "গ্রাহক বার্তা তৈরি করতে, গ্রাহকের নাম এবং বার্তার ধরন (payment reminder, promotional ইত্যাদি) উল্লেখ করুন।"
                        .to_string(),
                ),
            },
            ToolRun::ChatAssistant => {
                self.gateway
                    .complete(prompts::chat(&params.user_message, &params.history), options)
                    .await
            }
        }
    }

    /// Execute the named tools concurrently.
    ///
    /// Each tool's outcome is independent: a failing tool contributes a
    /// fixed Bangla apology under its id and never aborts the others.
    /// Unknown ids also resolve to the apology string.
    #[instrument(skip(self, registry, ctx, params), fields(tool_count = tool_ids.len()))]
    pub async fn execute_many(
        &self,
        registry: &ToolRegistry,
        tool_ids: &[String],
        ctx: &BusinessContext,
        params: &ToolParams,
    ) -> BTreeMap<String, String> {
        let runs = tool_ids.iter().map(|tool_id| async move {
            let outcome = match registry.tool(tool_id) {
                Some(tool) => self.execute(tool.run, ctx, params).await,
                None => Err(GatewayError::Parse(format!("unknown tool id: {tool_id}"))),
            };
            let text = match outcome {
                Ok(text) => text,
                Err(err) => {
                    error!(tool_id, %err, "tool execution failed");
                    format!("{tool_id} এ সমস্যা হয়েছে।")
                }
            };
            (tool_id.clone(), text)
        });

        join_all(runs).await.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::gateway::ChatMessage;
    use crate::registry::standard_registry;
    use bazarify_core::{Order, OrderId, OrderStatus, Product, ProductId, Taka};

    /// Gateway that answers every prompt with a canned string, recording
    /// the temperature of each call.
    struct CannedGateway {
        reply: &'static str,
        temperatures: Mutex<Vec<f32>>,
        fail: bool,
    }

    impl CannedGateway {
        fn ok(reply: &'static str) -> Self {
            Self {
                reply,
                temperatures: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                reply: "",
                temperatures: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    impl CompletionGateway for CannedGateway {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            options: CompletionOptions,
        ) -> Result<String, GatewayError> {
            self.temperatures
                .lock()
                .expect("lock")
                .push(options.temperature);
            if self.fail {
                Err(GatewayError::EmptyResponse)
            } else {
                Ok(self.reply.to_string())
            }
        }
    }

    fn stocked_context() -> BusinessContext {
        let products = vec![Product {
            id: ProductId::new(1),
            name: "চা পাতা".to_string(),
            category: Some("মুদি".to_string()),
            price: Taka::from_major(120),
            stock: 25,
        }];
        let orders = vec![Order {
            id: OrderId::new(1),
            total_amount: Taka::from_major(500),
            status: OrderStatus::Delivered,
            created_at: None,
            items: vec![],
        }];
        BusinessContext::from_records(products, orders, vec![], chrono::Utc::now())
    }

    #[tokio::test]
    async fn test_param_guard_skips_gateway() {
        let gateway = CannedGateway::ok("উত্তর");
        let executor = ToolExecutor::new(&gateway);
        let ctx = BusinessContext::default();

        let result = executor
            .execute(ToolRun::ProductDescription, &ctx, &ToolParams::default())
            .await
            .expect("guard result");
        assert!(result.contains("পণ্যের নাম"));
        assert!(gateway.temperatures.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_customer_message_uses_warmer_temperature() {
        let gateway = CannedGateway::ok("বার্তা");
        let executor = ToolExecutor::new(&gateway);
        let params = ToolParams {
            customer: Some(CustomerMessageParams {
                customer_name: "সালমা".to_string(),
                kind: crate::prompts::CustomerMessageKind::Promotional {
                    offer: "১০% ছাড়".to_string(),
                },
            }),
            ..Default::default()
        };

        executor
            .execute(ToolRun::CustomerMessage, &BusinessContext::default(), &params)
            .await
            .expect("completion");
        let temps = gateway.temperatures.lock().expect("lock");
        assert_eq!(temps.as_slice(), &[0.8]);
    }

    #[tokio::test]
    async fn test_empty_data_guards() {
        let gateway = CannedGateway::ok("উত্তর");
        let executor = ToolExecutor::new(&gateway);
        let ctx = BusinessContext::default();
        let params = ToolParams::default();

        let trend = executor
            .execute(ToolRun::SalesTrend, &ctx, &params)
            .await
            .expect("guard");
        assert_eq!(trend, "গত ৭ দিনে পর্যাপ্ত বিক্রয় তথ্য নেই।");

        let report = executor
            .execute(ToolRun::OrderReport, &ctx, &params)
            .await
            .expect("guard");
        assert_eq!(report, "এখনও কোনো অর্ডার নেই।");
    }

    #[tokio::test]
    async fn test_execute_many_isolates_failures() {
        let gateway = CannedGateway::failing();
        let executor = ToolExecutor::new(&gateway);
        let registry = standard_registry().expect("catalog");
        let ctx = stocked_context();

        let ids = vec![
            "business_insights".to_string(),
            "no_such_tool".to_string(),
        ];
        let results = executor
            .execute_many(&registry, &ids, &ctx, &ToolParams::default())
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(
            results.get("business_insights").map(String::as_str),
            Some("business_insights এ সমস্যা হয়েছে।")
        );
        assert_eq!(
            results.get("no_such_tool").map(String::as_str),
            Some("no_such_tool এ সমস্যা হয়েছে।")
        );
    }

    #[tokio::test]
    async fn test_execute_many_collects_results() {
        let gateway = CannedGateway::ok("বিশ্লেষণ");
        let executor = ToolExecutor::new(&gateway);
        let registry = standard_registry().expect("catalog");
        let ctx = stocked_context();

        let ids = vec![
            "business_insights".to_string(),
            "inventory_advice".to_string(),
        ];
        let results = executor
            .execute_many(&registry, &ids, &ctx, &ToolParams::default())
            .await;

        assert_eq!(results.len(), 2);
        assert!(results.values().all(|v| v == "বিশ্লেষণ"));
    }
}
