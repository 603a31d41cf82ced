//! Bazarify CLI - try the MunshiJi advisor against a demo shop.
//!
//! # Usage
//!
//! ```bash
//! # Ask the advisor a question (needs OPENROUTER_API_KEY)
//! bazarify ask "আমার স্টক কেমন আছে?"
//!
//! # Show which tools would run for a question, without calling the API
//! bazarify plan "গত সপ্তাহের বিক্রয় ট্রেন্ড"
//!
//! # Business health score for the demo shop
//! bazarify health
//!
//! # List the advisory tool catalog
//! bazarify tools
//! ```
//!
//! # Environment Variables
//!
//! - `OPENROUTER_API_KEY` - required by `ask`
//! - `OPENROUTER_MODEL`, `OPENROUTER_TIMEOUT_SECS` - optional overrides

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;
mod seed;

#[derive(Parser)]
#[command(name = "bazarify")]
#[command(author, version, about = "MunshiJi business advisor CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the advisor a question about the demo shop
    Ask {
        /// The question, in Bangla or English
        question: String,

        /// Print the full response as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the tool plan for a question without calling the API
    Plan {
        /// The question to plan for
        question: String,
    },
    /// Print the demo shop's business health score
    Health,
    /// List the advisory tool catalog
    Tools,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Ask { question, json } => commands::ask::run(&question, json).await?,
        Commands::Plan { question } => commands::inspect::plan(&question).await?,
        Commands::Health => commands::inspect::health().await,
        Commands::Tools => commands::inspect::tools()?,
    }
    Ok(())
}
