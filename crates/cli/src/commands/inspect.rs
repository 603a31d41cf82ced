//! Offline inspection commands: plan, health, and the tool catalog.
//!
//! None of these touch the completion API, so they work without an
//! `OPENROUTER_API_KEY`.

use bazarify_advisor::{BusinessContext, business_health, standard_registry};

use crate::seed;

/// Show which tools would run for a question against the demo shop.
///
/// # Errors
///
/// Returns an error if the standard catalog fails to assemble.
#[allow(clippy::print_stdout)]
pub async fn plan(question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let registry = standard_registry()?;
    let store = seed::demo_store();
    let ctx = BusinessContext::build(&store, seed::DEMO_SHOP).await;

    let ranked = registry.find_relevant_tools(question, &ctx);
    if ranked.is_empty() {
        println!("কোনো টুল মেলেনি; chat_assistant ফলব্যাক ব্যবহৃত হবে।");
        return Ok(());
    }

    for tool in ranked {
        println!("{:?}  {} - {}", tool.priority, tool.tool_id, tool.reason);
    }
    Ok(())
}

/// Print the demo shop's business health score.
#[allow(clippy::print_stdout)]
pub async fn health() {
    let store = seed::demo_store();
    let ctx = BusinessContext::build(&store, seed::DEMO_SHOP).await;
    let report = business_health(&ctx);

    println!("স্কোর: {}/100 ({})", report.score, report.grade);
    for issue in &report.issues {
        println!("  সমস্যা: {issue}");
    }
    for strength in &report.strengths {
        println!("  শক্তি: {strength}");
    }
}

/// List the advisory tool catalog.
///
/// # Errors
///
/// Returns an error if the standard catalog fails to assemble.
#[allow(clippy::print_stdout)]
pub fn tools() -> Result<(), Box<dyn std::error::Error>> {
    let registry = standard_registry()?;
    for meta in registry.metadata() {
        let params = if meta.requires_params {
            " (প্যারামিটার প্রয়োজন)"
        } else {
            ""
        };
        println!("{} {}  [{}]{params}", meta.icon, meta.name, meta.id);
        println!("    {}", meta.description);
    }
    Ok(())
}
