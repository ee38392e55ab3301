use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use schema::{EnhancedTransaction, ExportArtifact};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// `solana_enhanced_{address[..8]}_{timestamp}.json`, with `:` and `.` in
/// the RFC 3339 timestamp replaced so the name is portable.
pub fn export_file_name(address: &str, now: DateTime<Utc>) -> String {
    let prefix: String = address.chars().take(8).collect();
    let ts = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("solana_enhanced_{prefix}_{ts}.json")
}

/// Writes the export document and returns its path. Creates `output_dir`
/// when missing.
pub fn write_export(
    output_dir: &Path,
    address: &str,
    endpoint: &str,
    transactions: &[EnhancedTransaction],
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let fetched_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let artifact = ExportArtifact::new(address, endpoint, &fetched_at, transactions);

    let path = output_dir.join(export_file_name(address, now));
    let json = serde_json::to_string_pretty(&artifact)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;

    Ok(path)
}
