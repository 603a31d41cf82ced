//! The `ask` command: run the full advisory pipeline over the demo shop.

use tracing::info;

use bazarify_advisor::{AdvisorConfig, MunshiJi, OpenRouterClient, ToolParams};

use crate::seed;

/// Ask the advisor a question and print the response.
///
/// # Errors
///
/// Returns an error when configuration is missing or the unified
/// completion call fails.
pub async fn run(question: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdvisorConfig::from_env()?;
    let gateway = OpenRouterClient::new(&config);
    let service = MunshiJi::new(seed::demo_store(), gateway)?;

    info!(model = %config.model, "Asking MunshiJi");
    let advice = service
        .advise(seed::DEMO_SHOP, ToolParams::from_message(question))
        .await
        .map_err(|e| {
            tracing::error!(%e, "advisory pipeline failed");
            e.user_message()
        })?;

    if json {
        print_json(&serde_json::to_string_pretty(&advice)?);
    } else {
        print_advice(&advice);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json(body: &str) {
    println!("{body}");
}

#[allow(clippy::print_stdout)]
fn print_advice(advice: &bazarify_advisor::AdviceResponse) {
    println!("{}", advice.response);
    println!();
    println!("ব্যবহৃত টুল: {}", advice.tools_used.join(", "));

    if !advice.actions.is_empty() {
        println!();
        println!("প্রস্তাবিত পদক্ষেপ:");
        for action in &advice.actions {
            println!("  [{:?}/{:?}] {}", action.priority, action.urgency, action.reason);
        }
    }
}
