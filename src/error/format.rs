use crate::error::ProvisionerError;
use colored::Colorize;
use std::error::Error;

/// Render an error, its source chain and any attached diagnostic trail.
pub fn format_error_chain(error: &ProvisionerError) -> String {
    format_error_with_color(error, false)
}

pub fn format_error_with_color(error: &ProvisionerError, use_color: bool) -> String {
    let mut output = String::new();

    let header = if use_color {
        "Error:".red().bold().to_string()
    } else {
        "Error:".to_string()
    };
    output.push_str(&format!("{header} {error}\n"));

    let mut source = error.source();
    while let Some(cause) = source {
        output.push_str(&format!("  Caused by: {cause}\n"));
        source = cause.source();
    }

    let log = error.log();
    if !log.is_empty() {
        let title = if use_color {
            "Searched:".yellow().bold().to_string()
        } else {
            "Searched:".to_string()
        };
        output.push_str(&format!("\n{title}\n"));
        for line in log {
            output.push_str(&format!("  {line}\n"));
        }
    }

    output
}
