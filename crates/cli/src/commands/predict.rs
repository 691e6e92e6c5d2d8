//! Remote prediction command

use anyhow::Result;
use colored::Colorize;

use crate::client::{ApiClient, PredictPayload};
use crate::output::{format_price, print_breakdown, print_json, OutputFormat};

/// Request a prediction from the server and print it
pub async fn predict(client: &ApiClient, payload: &PredictPayload, format: OutputFormat) -> Result<()> {
    let response = client.predict(payload).await?;

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => {
            println!("{}", "Price Prediction".bold());
            println!("{}", "=".repeat(40));
            println!(
                "Predicted price: {}",
                format_price(response.predicted_selling_price).cyan()
            );
            if payload.apply_adjustments {
                println!(
                    "Adjusted price:  {}",
                    format_price(response.adjusted_prediction).cyan().bold()
                );
            }
            println!();
            print_breakdown(&response.breakdown);
        }
    }

    Ok(())
}
