use serde::Serialize;

use crate::cli::OutputFormat;

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value),
        OutputFormat::Raw => serde_json::to_string(value),
    }?;
    Ok(text)
}

/// Write a command result to stdout; logs stay on stderr.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}
