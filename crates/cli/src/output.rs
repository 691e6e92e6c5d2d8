//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use pricing_lib::AdjustmentBreakdown;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the breakdown table
#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Print the multiplier breakdown as a table
pub fn print_breakdown(breakdown: &AdjustmentBreakdown) {
    let rows: Vec<BreakdownRow> = breakdown
        .entries()
        .into_iter()
        .map(|(name, value)| BreakdownRow {
            component: name.to_string(),
            value: if name.ends_with("multiplier") {
                format_multiplier(value)
            } else {
                format_price(value)
            },
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a price with two decimals and thousands separators
pub fn format_price(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Format a multiplier, highlighting premiums and discounts
pub fn format_multiplier(multiplier: f64) -> String {
    let formatted = format!("x{:.4}", multiplier);
    if multiplier > 1.0 {
        formatted.green().to_string()
    } else if multiplier < 1.0 {
        formatted.red().to_string()
    } else {
        formatted
    }
}

/// Color a model status
pub fn color_status(loaded: bool) -> String {
    if loaded {
        "loaded".green().to_string()
    } else {
        "not loaded".red().to_string()
    }
}
