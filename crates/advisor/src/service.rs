//! MunshiJi, the advisory orchestrator.
//!
//! One request runs the full pipeline: build the business context, plan
//! which tools apply, execute them concurrently, compose and request the
//! unified Bangla response, then derive structured actions. The service is
//! generic over the record store and completion gateway so tests can
//! substitute both.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use bazarify_core::{ShopId, Taka};

use crate::actions::{self, Action};
use crate::composer;
use crate::context::BusinessContext;
use crate::error::AdvisorError;
use crate::gateway::{ChatMessage, CompletionGateway, CompletionOptions};
use crate::registry::{
    PriorityLabel, RegistryError, ToolExecutor, ToolParams, ToolRegistry, standard_registry,
};
use crate::store::RecordStore;

/// How many trailing history messages accompany the final unified call.
const HISTORY_WINDOW: usize = 4;

/// Which tools will run for a request and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub tools_to_use: Vec<String>,
    pub reasoning: Vec<String>,
    pub priority: PriorityLabel,
}

/// Headline numbers echoed back with every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_revenue: Taka,
    pub low_stock_count: usize,
}

impl From<&BusinessContext> for ContextSummary {
    fn from(ctx: &BusinessContext) -> Self {
        Self {
            total_products: ctx.total_products,
            total_orders: ctx.total_orders,
            total_revenue: ctx.total_revenue,
            low_stock_count: ctx.low_stock_products.len(),
        }
    }
}

/// Complete advisory response for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResponse {
    /// The unified Bangla response text.
    pub response: String,
    /// Structured, UI-renderable next steps.
    pub actions: Vec<Action>,
    /// Raw per-tool insight text, keyed by tool id.
    pub insights: BTreeMap<String, String>,
    /// Ids of the tools that ran.
    pub tools_used: Vec<String>,
    /// Why each tool was selected, parallel to `tools_used`.
    pub reasoning: Vec<String>,
    /// Headline numbers from the context the response was built on.
    pub context: ContextSummary,
}

/// Business health score with issues and strengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHealth {
    /// Score in `0..=100`.
    pub score: u8,
    /// Bangla grade label derived from the score.
    pub grade: String,
    pub issues: Vec<String>,
    pub strengths: Vec<String>,
}

/// The advisory service.
pub struct MunshiJi<S, G> {
    store: S,
    gateway: G,
    registry: ToolRegistry,
}

impl<S: RecordStore, G: CompletionGateway> MunshiJi<S, G> {
    /// Create the service with the standard tool catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the standard catalog fails to assemble.
    pub fn new(store: S, gateway: G) -> Result<Self, RegistryError> {
        Ok(Self {
            store,
            gateway,
            registry: standard_registry()?,
        })
    }

    /// Create the service with a custom registry.
    pub const fn with_registry(store: S, gateway: G, registry: ToolRegistry) -> Self {
        Self {
            store,
            gateway,
            registry,
        }
    }

    /// The tool registry in use.
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Answer a shop owner's question with the full advisory pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error only when the final unified completion call fails.
    /// Individual tool failures degrade to apology strings in `insights`
    /// and never fail the request.
    pub async fn advise(
        &self,
        shop_id: ShopId,
        params: ToolParams,
    ) -> Result<AdviceResponse, AdvisorError> {
        self.advise_at(shop_id, params, Utc::now()).await
    }

    /// Like [`advise`](Self::advise) with an explicit clock, for
    /// deterministic tests.
    #[instrument(skip(self, params), fields(shop_id = %shop_id, query_len = params.user_message.len()))]
    pub async fn advise_at(
        &self,
        shop_id: ShopId,
        params: ToolParams,
        now: DateTime<Utc>,
    ) -> Result<AdviceResponse, AdvisorError> {
        let ctx = BusinessContext::build_at(&self.store, shop_id, now).await;

        let plan = self.plan(&params.user_message, &ctx);
        info!(tools = ?plan.tools_to_use, priority = ?plan.priority, "action plan ready");

        let executor = ToolExecutor::new(&self.gateway);
        let insights = executor
            .execute_many(&self.registry, &plan.tools_to_use, &ctx, &params)
            .await;

        let response = self
            .unified_response(
                &params.user_message,
                &params.history,
                &ctx,
                &plan.tools_to_use,
                &insights,
            )
            .await?;

        let actions = actions::extract(&ctx, now);

        Ok(AdviceResponse {
            response,
            actions,
            insights,
            tools_used: plan.tools_to_use,
            reasoning: plan.reasoning,
            context: ContextSummary::from(&ctx),
        })
    }

    /// Plan which tools apply to the query. Falls back to the chat
    /// assistant when nothing matches.
    #[must_use]
    pub fn plan(&self, user_message: &str, ctx: &BusinessContext) -> ActionPlan {
        let ranked = self.registry.find_relevant_tools(user_message, ctx);

        if ranked.is_empty() {
            let fallback_id = self
                .registry
                .fallback()
                .map_or("chat_assistant", |tool| tool.id);
            return ActionPlan {
                tools_to_use: vec![fallback_id.to_string()],
                reasoning: vec!["সাধারণ ব্যবসায়িক পরামর্শ প্রদান".to_string()],
                priority: PriorityLabel::Low,
            };
        }

        let priority = ranked[0].priority;
        let (tools_to_use, reasoning) = ranked
            .into_iter()
            .map(|rt| (rt.tool_id, rt.reason))
            .unzip();

        ActionPlan {
            tools_to_use,
            reasoning,
            priority,
        }
    }

    /// Request the final unified Bangla response from the gateway.
    async fn unified_response(
        &self,
        user_message: &str,
        history: &[ChatMessage],
        ctx: &BusinessContext,
        tool_order: &[String],
        insights: &BTreeMap<String, String>,
    ) -> Result<String, AdvisorError> {
        let tail_start = history.len().saturating_sub(HISTORY_WINDOW);
        let tail = history.get(tail_start..).unwrap_or_default();

        let mut messages = Vec::with_capacity(tail.len() + 2);
        messages.push(ChatMessage::system(composer::system_prompt()));
        messages.extend_from_slice(tail);
        messages.push(ChatMessage::user(composer::user_prompt(
            user_message,
            ctx,
            tool_order,
            insights,
        )));

        let response = self
            .gateway
            .complete(messages, CompletionOptions::default())
            .await?;

        let validation = composer::validate_structure(&response);
        if !validation.valid {
            warn!(feedback = %validation.feedback, "response quality issue");
        }

        Ok(response)
    }
}

/// Score a shop's business health from its context.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn business_health(ctx: &BusinessContext) -> BusinessHealth {
    let mut score: i32 = 50;
    let mut issues = Vec::new();
    let mut strengths = Vec::new();

    if ctx.has_out_of_stock {
        score -= 15;
        issues.push(format!("{}টি পণ্য স্টক শেষ", ctx.out_of_stock_products.len()));
    }
    if ctx.has_low_stock {
        score -= 10;
        issues.push(format!("{}টি পণ্যের স্টক কম", ctx.low_stock_products.len()));
    }
    if ctx.well_stocked_products.len() as f64 > ctx.total_products as f64 * 0.7 {
        score += 10;
        strengths.push("বেশিরভাগ পণ্যের স্টক ভালো আছে".to_string());
    }

    if ctx.weekly_revenue > Taka::from_major(10_000) {
        score += 15;
        strengths.push("সাপ্তাহিক বিক্রয় ভালো".to_string());
    }
    if ctx.total_orders > 50 {
        score += 10;
        strengths.push("ভালো অর্ডার সংখ্যা".to_string());
    }

    let delivery_rate_pct = ctx.delivery_rate() * 100.0;
    if delivery_rate_pct > 80.0 {
        score += 15;
        strengths.push("উচ্চ ডেলিভারি হার".to_string());
    } else if delivery_rate_pct < 50.0 {
        score -= 10;
        issues.push("ডেলিভারি হার কম".to_string());
    }

    if ctx.total_customers > 20 {
        score += 10;
        strengths.push("ভালো গ্রাহক সংখ্যা".to_string());
    }

    let grade = if score >= 80 {
        "চমৎকার"
    } else if score >= 60 {
        "ভালো"
    } else if score >= 40 {
        "মাঝারি"
    } else {
        "উন্নতি প্রয়োজন"
    };

    BusinessHealth {
        score: score.clamp(0, 100) as u8,
        grade: grade.to_string(),
        issues,
        strengths,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::store::InMemoryStore;
    use bazarify_core::{Order, OrderId, OrderStatus, Product, ProductId};
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct ScriptedGateway {
        replies: Mutex<Vec<String>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedGateway {
        fn always(reply: &str) -> Self {
            Self {
                replies: Mutex::new(vec![reply.to_string()]),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionGateway for ScriptedGateway {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            _options: CompletionOptions,
        ) -> Result<String, GatewayError> {
            self.calls.lock().expect("lock").push(messages);
            let replies = self.replies.lock().expect("lock");
            replies
                .last()
                .cloned()
                .ok_or(GatewayError::EmptyResponse)
        }
    }

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn seeded_store(shop_id: ShopId) -> InMemoryStore {
        let products = vec![
            Product {
                id: ProductId::new(1),
                name: "চাল".to_string(),
                category: Some("মুদি".to_string()),
                price: Taka::from_major(60),
                stock: 0,
            },
            Product {
                id: ProductId::new(2),
                name: "ডাল".to_string(),
                category: Some("মুদি".to_string()),
                price: Taka::from_major(120),
                stock: 30,
            },
        ];
        let orders = vec![Order {
            id: OrderId::new(1),
            total_amount: Taka::from_major(600),
            status: OrderStatus::Delivered,
            created_at: Some(frozen_now() - chrono::Duration::days(1)),
            items: vec![],
        }];
        InMemoryStore::for_shop(shop_id, products, orders, vec![])
    }

    #[tokio::test]
    async fn test_advise_runs_full_pipeline() {
        let shop_id = ShopId::new(7);
        let gateway = ScriptedGateway::always("আপনার ২টি পণ্য আছে এবং ১টি স্টক শেষ।");
        let service =
            MunshiJi::new(seeded_store(shop_id), gateway).expect("standard catalog");

        let response = service
            .advise_at(
                shop_id,
                ToolParams::from_message("আমার স্টক দেখাও"),
                frozen_now(),
            )
            .await
            .expect("advice");

        assert!(response.response.contains("২টি পণ্য"));
        assert_eq!(response.tools_used, vec!["inventory_advice".to_string()]);
        assert_eq!(response.reasoning, vec!["জরুরি: স্টক সমস্যা সনাক্ত".to_string()]);
        assert_eq!(response.context.total_products, 2);
        assert_eq!(response.context.total_orders, 1);
        assert_eq!(response.insights.len(), 1);
        // Out-of-stock চাল yields an urgent restock action
        assert!(response
            .actions
            .iter()
            .any(|a| a.reason.contains("চাল")));
    }

    #[tokio::test]
    async fn test_plan_falls_back_to_chat_assistant() {
        let shop_id = ShopId::new(7);
        let gateway = ScriptedGateway::always("উত্তর");
        let service =
            MunshiJi::new(seeded_store(shop_id), gateway).expect("standard catalog");

        let plan = service.plan("কিছু একটা", &BusinessContext::default());
        assert_eq!(plan.tools_to_use, vec!["chat_assistant".to_string()]);
        assert_eq!(plan.reasoning, vec!["সাধারণ ব্যবসায়িক পরামর্শ প্রদান".to_string()]);
        assert_eq!(plan.priority, PriorityLabel::Low);
    }

    #[tokio::test]
    async fn test_history_truncated_to_last_four() {
        let shop_id = ShopId::new(7);
        let gateway = ScriptedGateway::always("১টি উত্তর");
        let service =
            MunshiJi::new(seeded_store(shop_id), gateway).expect("standard catalog");

        let history: Vec<ChatMessage> = (0..6)
            .map(|i| ChatMessage::user(format!("বার্তা {i}")))
            .collect();
        let params = ToolParams {
            user_message: "অর্ডার রিপোর্ট দাও".to_string(),
            history,
            ..Default::default()
        };
        service
            .advise_at(shop_id, params, frozen_now())
            .await
            .expect("advice");

        let calls = service.gateway.calls.lock().expect("lock");
        // The last call is the unified one: system + 4 history + user
        let unified = calls.last().expect("unified call");
        assert_eq!(unified.len(), 6);
        assert_eq!(unified[1].content, "বার্তা 2");
        assert_eq!(unified[4].content, "বার্তা 5");
    }

    #[test]
    fn test_health_empty_shop() {
        let health = business_health(&BusinessContext::default());
        // Base 50, minus 10 for the zero delivery rate
        assert_eq!(health.score, 40);
        assert_eq!(health.grade, "মাঝারি");
        assert_eq!(health.issues, vec!["ডেলিভারি হার কম".to_string()]);
        assert!(health.strengths.is_empty());
    }

    #[test]
    fn test_health_thriving_shop() {
        let mut ctx = BusinessContext {
            total_products: 10,
            total_orders: 60,
            total_customers: 25,
            weekly_revenue: Taka::from_major(15_000),
            well_stocked_products: (0..10)
                .map(|i| Product {
                    id: ProductId::new(i),
                    name: format!("পণ্য {i}"),
                    category: None,
                    price: Taka::from_major(100),
                    stock: 40,
                })
                .collect(),
            ..Default::default()
        };
        ctx.orders_by_status.delivered = 55;

        let health = business_health(&ctx);
        assert_eq!(health.score, 100);
        assert_eq!(health.grade, "চমৎকার");
        assert!(health.issues.is_empty());
        assert_eq!(health.strengths.len(), 5);
    }

    #[test]
    fn test_health_struggling_shop() {
        let ctx = BusinessContext {
            has_out_of_stock: true,
            has_low_stock: true,
            total_products: 5,
            out_of_stock_products: vec![Product {
                id: ProductId::new(1),
                name: "চাল".to_string(),
                category: None,
                price: Taka::from_major(60),
                stock: 0,
            }],
            low_stock_products: vec![Product {
                id: ProductId::new(2),
                name: "ডাল".to_string(),
                category: None,
                price: Taka::from_major(120),
                stock: 3,
            }],
            ..Default::default()
        };

        let health = business_health(&ctx);
        // 50 - 15 - 10 - 10 (zero delivery rate)
        assert_eq!(health.score, 15);
        assert_eq!(health.grade, "উন্নতি প্রয়োজন");
        assert_eq!(health.issues.len(), 3);
    }
}
