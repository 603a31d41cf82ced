//! Advisory tool registry.
//!
//! A [`Tool`] is a closed capability definition: stable id, Bangla-facing
//! metadata, keyword list, an applicability gate, a priority (static or
//! computed from the business context), and a [`ToolRun`] variant naming
//! which execution path the [`executor`](crate::registry::executor) takes.
//!
//! The registry holds tools in registration order; selection walks that
//! order, so ties between equal-priority tools resolve to whichever was
//! registered first.

mod catalog;
mod executor;

pub use catalog::standard_registry;
pub use executor::{ToolExecutor, ToolParams};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use thiserror::Error;

use crate::context::BusinessContext;

/// Errors raised while assembling a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid tool definition for '{id}': {reason}")]
    InvalidToolDefinition { id: String, reason: String },
    #[error("duplicate tool id '{0}'")]
    DuplicateTool(String),
}

/// Relative importance of a tool for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLabel {
    High,
    Medium,
    Low,
}

impl PriorityLabel {
    /// Numeric rank used for ordering. Higher is more important.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

/// A tool's priority, either fixed or derived from the business context.
#[derive(Clone, Copy)]
pub enum Priority {
    Static(PriorityLabel),
    Dynamic(fn(&BusinessContext) -> PriorityLabel),
}

impl Priority {
    /// Resolve the priority against the given context.
    #[must_use]
    pub fn resolve(&self, ctx: &BusinessContext) -> PriorityLabel {
        match self {
            Self::Static(label) => *label,
            Self::Dynamic(f) => f(ctx),
        }
    }
}

impl std::fmt::Debug for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(label) => f.debug_tuple("Static").field(label).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Which execution path a tool takes.
///
/// Closed enum rather than boxed closures so the executor can match
/// exhaustively and the compiler flags a tool added without a run path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRun {
    BusinessInsights,
    SalesTrend,
    InventoryAdvice,
    OrderReport,
    ProductDescription,
    CustomerMessage,
    ChatAssistant,
}

/// Serializable tool metadata, for catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub requires_params: bool,
}

/// A tool matched to a request, with its resolved priority and the
/// context-derived reason it was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedTool {
    pub tool_id: String,
    pub priority: PriorityLabel,
    pub reason: String,
}

/// One advisory capability.
pub struct Tool {
    /// Stable identifier, snake_case.
    pub id: &'static str,
    /// Bangla display name.
    pub name: &'static str,
    /// Emoji icon shown next to the name.
    pub icon: &'static str,
    /// Bangla description of what the tool does.
    pub description: &'static str,
    /// Lowercase keywords (Bangla and English) matched against the query.
    /// Empty means the tool matches every query that passes its gate.
    pub keywords: &'static [&'static str],
    /// Applicability gate over context and the lowercased query.
    pub gate: fn(&BusinessContext, &str) -> bool,
    /// Priority, static or context-derived.
    pub priority: Priority,
    /// Context-derived Bangla explanation of why this tool applies.
    pub reason: fn(&BusinessContext) -> String,
    /// Whether the tool needs caller-supplied parameters to run fully.
    pub requires_params: bool,
    /// Fallback tools are excluded from keyword selection and only used
    /// when nothing else matched.
    pub is_fallback: bool,
    /// Execution path.
    pub run: ToolRun,
}

impl Tool {
    /// Start building a tool with defaults for the optional fields.
    #[must_use]
    pub fn builder(id: &'static str, name: &'static str, run: ToolRun) -> ToolBuilder {
        ToolBuilder::new(id, name, run)
    }

    /// Serializable metadata view.
    #[must_use]
    pub fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            id: self.id.to_string(),
            name: self.name.to_string(),
            icon: self.icon.to_string(),
            description: self.description.to_string(),
            requires_params: self.requires_params,
        }
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("requires_params", &self.requires_params)
            .field("is_fallback", &self.is_fallback)
            .field("run", &self.run)
            .finish_non_exhaustive()
    }
}

fn gate_always(_: &BusinessContext, _: &str) -> bool {
    true
}

fn reason_none(_: &BusinessContext) -> String {
    String::new()
}

/// Builder for [`Tool`], filling in defaults for the optional fields.
pub struct ToolBuilder {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
    gate: fn(&BusinessContext, &str) -> bool,
    priority: Priority,
    reason: fn(&BusinessContext) -> String,
    requires_params: bool,
    is_fallback: bool,
    run: ToolRun,
}

impl ToolBuilder {
    fn new(id: &'static str, name: &'static str, run: ToolRun) -> Self {
        Self {
            id,
            name,
            icon: "🔧",
            description: "",
            keywords: &[],
            gate: gate_always,
            priority: Priority::Static(PriorityLabel::Medium),
            reason: reason_none,
            requires_params: false,
            is_fallback: false,
            run,
        }
    }

    #[must_use]
    pub const fn icon(mut self, icon: &'static str) -> Self {
        self.icon = icon;
        self
    }

    #[must_use]
    pub const fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub const fn keywords(mut self, keywords: &'static [&'static str]) -> Self {
        self.keywords = keywords;
        self
    }

    #[must_use]
    pub fn gate(mut self, gate: fn(&BusinessContext, &str) -> bool) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn reason(mut self, reason: fn(&BusinessContext) -> String) -> Self {
        self.reason = reason;
        self
    }

    #[must_use]
    pub const fn requires_params(mut self) -> Self {
        self.requires_params = true;
        self
    }

    #[must_use]
    pub const fn fallback(mut self) -> Self {
        self.is_fallback = true;
        self
    }

    /// Finish the tool.
    ///
    /// # Errors
    ///
    /// Returns an error when the id is empty or not snake_case ASCII, or
    /// when the display name or description is empty.
    pub fn build(self) -> Result<Tool, RegistryError> {
        if self.id.is_empty()
            || !self
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(RegistryError::InvalidToolDefinition {
                id: self.id.to_string(),
                reason: "id must be non-empty snake_case ASCII".to_string(),
            });
        }
        if self.name.is_empty() {
            return Err(RegistryError::InvalidToolDefinition {
                id: self.id.to_string(),
                reason: "display name must not be empty".to_string(),
            });
        }
        if self.description.is_empty() {
            return Err(RegistryError::InvalidToolDefinition {
                id: self.id.to_string(),
                reason: "description must not be empty".to_string(),
            });
        }

        Ok(Tool {
            id: self.id,
            name: self.name,
            icon: self.icon,
            description: self.description,
            keywords: self.keywords,
            gate: self.gate,
            priority: self.priority,
            reason: self.reason,
            requires_params: self.requires_params,
            is_fallback: self.is_fallback,
            run: self.run,
        })
    }
}

/// Ordered collection of tools with id lookup.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, preserving registration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateTool`] when a tool with the same
    /// id is already registered.
    pub fn register(&mut self, tool: Tool) -> Result<(), RegistryError> {
        if self.index.contains_key(tool.id) {
            return Err(RegistryError::DuplicateTool(tool.id.to_string()));
        }
        self.index.insert(tool.id, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by id.
    #[must_use]
    pub fn tool(&self, id: &str) -> Option<&Tool> {
        self.index.get(id).and_then(|&i| self.tools.get(i))
    }

    /// All tools in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Metadata for every registered tool, in registration order.
    #[must_use]
    pub fn metadata(&self) -> Vec<ToolMetadata> {
        self.tools.iter().map(Tool::metadata).collect()
    }

    /// Whether the given tool needs caller-supplied parameters.
    #[must_use]
    pub fn requires_params(&self, id: &str) -> bool {
        self.tool(id).is_some_and(|t| t.requires_params)
    }

    /// The first registered fallback tool, if any.
    #[must_use]
    pub fn fallback(&self) -> Option<&Tool> {
        self.tools.iter().find(|t| t.is_fallback)
    }

    /// Select the tools relevant to a query, ranked by resolved priority.
    ///
    /// A non-fallback tool matches when its gate passes and either its
    /// keyword list is empty or some keyword occurs as a substring of the
    /// lowercased query. Fallback tools never match here. The sort is
    /// stable, so equal-priority tools keep registration order.
    #[instrument(skip(self, ctx), fields(query_len = query.len()))]
    #[must_use]
    pub fn find_relevant_tools(&self, query: &str, ctx: &BusinessContext) -> Vec<RankedTool> {
        let lowered = query.to_lowercase();

        let mut ranked: Vec<RankedTool> = self
            .tools
            .iter()
            .filter(|tool| !tool.is_fallback)
            .filter(|tool| (tool.gate)(ctx, &lowered))
            .filter(|tool| {
                tool.keywords.is_empty() || tool.keywords.iter().any(|kw| lowered.contains(kw))
            })
            .map(|tool| RankedTool {
                tool_id: tool.id.to_string(),
                priority: tool.priority.resolve(ctx),
                reason: (tool.reason)(ctx),
            })
            .collect();

        ranked.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        ranked
    }
}
