mod progress;
mod styling;
mod tables;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::Path;

pub use progress::FetchProgress;
use styling::{dim, title};
pub use tables::{entity_table, list_table, projected_table};

/// Prints the `dcilens` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        title("🔎 dcilens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("DCI pipelines, jobs and components")
    );
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Writes `rendered` to `output`, or to stdout when no path is given.
pub fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Output written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
