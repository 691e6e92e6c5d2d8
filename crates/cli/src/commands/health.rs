//! Server health command

use anyhow::Result;
use colored::Colorize;

use crate::client::ApiClient;
use crate::output::{color_status, print_json, print_success, print_warning, OutputFormat};

/// Show whether the server has its model loaded
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health = client.health().await?;

    match format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Table => {
            println!("{}", "Server Health".bold());
            println!("{}", "=".repeat(40));
            println!("Model:          {}", color_status(health.model_loaded));
            println!("Model path:     {}", health.model_path.cyan());
            if let Some(names) = &health.feature_names {
                println!("Features:       {}", names.join(", "));
            }
            println!("CORS:           {}", if health.cors_available { "enabled" } else { "disabled" });
            println!();

            match &health.load_error {
                Some(error) => print_warning(&format!("Predictions disabled: {}", error)),
                None if health.model_loaded => print_success("Ready to serve predictions"),
                None => print_warning("Model not loaded"),
            }
        }
    }

    Ok(())
}
