use anyhow::{Context, Result, anyhow};
use log::info;
use serde_json::Value;
use std::{fs, path::Path};

/// Loads a saved enhanced API response: a JSON array of raw transactions.
pub fn load_raw_transactions(path: &Path) -> Result<Vec<Value>> {
    info!("replay from {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let v: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match v {
        Value::Array(txs) => Ok(txs),
        _ => Err(anyhow!(
            "{} does not contain a JSON array of transactions",
            path.display()
        )),
    }
}
