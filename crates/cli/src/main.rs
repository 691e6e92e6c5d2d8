//! Bike Price Predictor CLI
//!
//! A command-line tool for requesting price predictions, checking server
//! health and trying out the marketplace adjustments offline.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{adjust, health, predict};
use pricing_lib::ListingAttributes;

/// Bike Price Predictor CLI
#[derive(Parser)]
#[command(name = "bpp")]
#[command(author, version, about = "CLI for the Bike Price Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via BPP_API_URL env var)
    #[arg(long, env = "BPP_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Optional listing attributes shared by `predict` and `adjust`
#[derive(clap::Args)]
pub struct ListingArgs {
    /// Ownership, e.g. "1st owner"
    #[arg(long)]
    pub owner: Option<String>,

    /// Seller type: individual, dealer or "trustmark dealer"
    #[arg(long)]
    pub seller_type: Option<String>,

    /// Model name, e.g. "Royal Enfield Classic 350"
    #[arg(long)]
    pub model_name: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict a resale price through the server
    Predict {
        /// Manufacturing year
        #[arg(long)]
        year: i32,

        /// Kilometers driven
        #[arg(long)]
        km_driven: f64,

        /// Original ex-showroom price
        #[arg(long = "price")]
        ex_showroom_price: f64,

        #[command(flatten)]
        listing: ListingArgs,

        /// Apply marketplace heuristic adjustments
        #[arg(long)]
        adjust: bool,
    },

    /// Show server and model status
    Health,

    /// Apply the marketplace heuristics to a base price locally
    Adjust {
        /// Base price to adjust
        #[arg(long)]
        base: f64,

        /// Kilometers driven
        #[arg(long)]
        km_driven: Option<f64>,

        #[command(flatten)]
        listing: ListingArgs,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            year,
            km_driven,
            ex_showroom_price,
            listing,
            adjust,
        } => {
            let client = api_client(cli.api_url)?;
            let payload = client::PredictPayload {
                year,
                km_driven,
                ex_showroom_price,
                owner: listing.owner,
                seller_type: listing.seller_type,
                model_name: listing.model_name,
                apply_adjustments: adjust,
            };
            predict::predict(&client, &payload, cli.format).await?;
        }
        Commands::Health => {
            let client = api_client(cli.api_url)?;
            health::show_health(&client, cli.format).await?;
        }
        Commands::Adjust {
            base,
            km_driven,
            listing,
        } => {
            let attributes = ListingAttributes {
                owner: listing.owner.as_deref(),
                seller_type: listing.seller_type.as_deref(),
                model_name: listing.model_name.as_deref(),
                km_driven,
            };
            adjust::run_adjust(base, &attributes, cli.format)?;
        }
    }

    Ok(())
}

fn api_client(explicit_url: Option<String>) -> Result<client::ApiClient> {
    let config = config::Config::load()?;
    client::ApiClient::new(&config.resolve_api_url(explicit_url))
}
