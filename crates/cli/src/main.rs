//! Fitout CLI - shipping tools for operators.
//!
//! # Usage
//!
//! ```bash
//! # Flat-rate quote for a 120 kg drawer system to Perth
//! fitout-cli quote --state WA --postcode 6000 --item 120,180,120,30
//!
//! # Same request through BigPost when it is enabled and configured
//! fitout-cli quote --state WA --postcode 6000 --item 120,180,120,30 --live
//!
//! # Zone of every state from the Melbourne warehouse
//! fitout-cli zones --from VIC
//!
//! # Show what the storefront would load from the environment
//! fitout-cli check-config
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use fitout_core::{ShippingClass, StateCode};

mod commands;

#[derive(Parser)]
#[command(name = "fitout-cli")]
#[command(author, version, about = "Fitout shipping CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a consignment and print the quotes as JSON
    Quote {
        /// Destination state code (e.g. WA)
        #[arg(short, long)]
        state: StateCode,

        /// Destination postcode (4 digits)
        #[arg(short, long)]
        postcode: String,

        /// Item as `weight_kg,length_cm,width_cm,height_cm[,quantity]`; repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Handling class applied to every item
        #[arg(short, long)]
        class: Option<ShippingClass>,

        /// Dispatch state for flat-rate zoning (defaults to the warehouse)
        #[arg(long)]
        from: Option<StateCode>,

        /// Resolve through BigPost using the storefront configuration
        #[arg(long)]
        live: bool,
    },
    /// Print the flat-rate zone for every destination state
    Zones {
        /// Dispatch state
        #[arg(short, long)]
        from: StateCode,
    },
    /// Load storefront configuration from the environment and summarize it
    CheckConfig,
}

#[tokio::main]
async fn main() {
    // Pick up RUST_LOG and storefront settings from .env
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Quote {
            state,
            postcode,
            items,
            class,
            from,
            live,
        } => {
            let args = commands::quote::QuoteArgs {
                state,
                postcode,
                items,
                class,
                from,
            };
            if live {
                commands::quote::live(&args).await?;
            } else {
                commands::quote::offline(&args)?;
            }
        }
        Commands::Zones { from } => commands::zones::print(from),
        Commands::CheckConfig => commands::config::check()?,
    }
    Ok(())
}
