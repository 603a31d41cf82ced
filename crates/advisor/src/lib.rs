//! MunshiJi advisory engine for Bazarify.
//!
//! Answers shop owners' Bangla business questions by grounding a language
//! model in the shop's real records. A request flows through five stages:
//! context building ([`context`]), tool planning ([`registry`]), concurrent
//! tool execution, unified response composition ([`composer`]), and
//! structured action extraction ([`actions`]). The [`service::MunshiJi`]
//! orchestrator ties the stages together over pluggable [`store`] and
//! [`gateway`] backends.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod composer;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod prompts;
pub mod registry;
pub mod service;
pub mod store;

pub use actions::{Action, ActionDetail, Urgency};
pub use config::{AdvisorConfig, ConfigError};
pub use context::BusinessContext;
pub use error::AdvisorError;
pub use gateway::{ChatMessage, CompletionGateway, CompletionOptions, GatewayError, OpenRouterClient};
pub use registry::{
    PriorityLabel, RankedTool, RegistryError, Tool, ToolExecutor, ToolParams, ToolRegistry,
    standard_registry,
};
pub use service::{ActionPlan, AdviceResponse, BusinessHealth, MunshiJi, business_health};
pub use store::{InMemoryStore, RecordStore, StoreError};
