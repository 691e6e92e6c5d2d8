//! Offline heuristic adjustment command
//!
//! Runs the marketplace adjuster locally against a known base price, which
//! is handy for checking what a listing's attributes would do without a
//! server or model.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::output::{format_price, print_breakdown, print_info, print_json, OutputFormat};
use pricing_lib::{adjust, AdjustmentBreakdown, ListingAttributes};

#[derive(Serialize)]
struct AdjustOutput<'a> {
    base_prediction: f64,
    adjusted_prediction: f64,
    matched_keyword: Option<&'a str>,
    breakdown: &'a AdjustmentBreakdown,
}

/// Apply the heuristics to `base` and print the breakdown
pub fn run_adjust(
    base: f64,
    attributes: &ListingAttributes<'_>,
    format: OutputFormat,
) -> Result<()> {
    if !base.is_finite() || base < 0.0 {
        anyhow::bail!("Base price must be a non-negative number, got {}", base);
    }

    let adjustment = adjust(base, attributes, true);

    match format {
        OutputFormat::Json => print_json(&AdjustOutput {
            base_prediction: base,
            adjusted_prediction: adjustment.adjusted_prediction,
            matched_keyword: adjustment.matched_keyword,
            breakdown: &adjustment.breakdown,
        })?,
        OutputFormat::Table => {
            println!("{}", "Heuristic Adjustment".bold());
            println!("{}", "=".repeat(40));
            println!("Base price:     {}", format_price(base).cyan());
            println!(
                "Adjusted price: {}",
                format_price(adjustment.adjusted_prediction).cyan().bold()
            );
            if attributes.model_name.is_some() {
                match adjustment.matched_keyword {
                    Some(keyword) => print_info(&format!("Brand keyword matched: {}", keyword)),
                    None => print_info("No brand keyword matched"),
                }
            }
            println!();
            print_breakdown(&adjustment.breakdown);
        }
    }

    Ok(())
}
