use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use schema::{EnhancedTransaction, Summary};
use serde_json::Value;
use std::{collections::HashSet, path::PathBuf};

use crate::{config::Config, export, helius::HeliusClient, replay};

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Normalizes and decodes a raw batch. Order is preserved.
pub fn enrich(raw: &[Value]) -> Vec<EnhancedTransaction> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut logged_schema = false;

    raw.iter()
        .map(|r| {
            let tx = EnhancedTransaction::from_raw(r).with_decoded_instructions();

            if let Some(sig) = r.get("signature").and_then(|s| s.as_str())
                && !sig.is_empty()
                && !seen.insert(sig)
            {
                warn!("duplicate signature in response: {}", sig);
            }

            debug!(
                "tx sig={} type={} success={} fee={} ixs={} decoded={}",
                tx.signature,
                tx.tx_type,
                tx.success,
                tx.fee,
                tx.instruction_node_count(),
                tx.decoded_instruction_count()
            );

            if !logged_schema && log::log_enabled!(log::Level::Debug) {
                let sample = serde_json::to_string_pretty(&tx.instructions).unwrap_or_default();
                debug!("🔍 First transaction instructions sample:\n{}", sample);
                logged_schema = true;
            }

            tx
        })
        .collect()
}

/// Fetch (or replay) → enrich → export. Returns the written file.
pub async fn run(cfg: &Config) -> Result<PathBuf> {
    let (raw, endpoint) = match &cfg.from_file {
        Some(path) => (
            replay::load_raw_transactions(path)?,
            path.display().to_string(),
        ),
        None => {
            let api_key = cfg.api_key.clone().unwrap_or_default();
            let client = HeliusClient::new(cfg.api_url.clone(), api_key)?;
            info!(
                "fetching enhanced transactions address={} limit={}",
                cfg.address, cfg.fetch.limit
            );
            (
                client.get_transactions(&cfg.address, &cfg.fetch).await?,
                cfg.api_url.clone(),
            )
        }
    };
    info!("received {} raw transactions", raw.len());

    let fetched_at = Utc::now();
    let txs = enrich(&raw);

    let decoded: usize = txs.iter().map(|t| t.decoded_instruction_count()).sum();
    let nodes: usize = txs.iter().map(|t| t.instruction_node_count()).sum();
    info!("decoded {} of {} instructions (inner included)", decoded, nodes);

    let path = export::write_export(&cfg.output_dir, &cfg.address, &endpoint, &txs, fetched_at)?;
    info!("wrote {}", path.display());

    log_summary(&Summary::from_transactions(&txs));
    Ok(path)
}

fn fmt_time(t: Option<i64>) -> String {
    match t.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0)) {
        Some(dt) => dt.to_rfc3339(),
        None => "n/a".to_string(),
    }
}

fn log_summary(s: &Summary) {
    info!(
        "summary: total={} successful={} failed={}",
        s.total(),
        s.successful,
        s.failed
    );
    info!(
        "  fees={} lamports ({:.6} SOL) compute_units={}",
        s.total_fees,
        s.total_fees as f64 / LAMPORTS_PER_SOL,
        s.total_compute_units
    );
    for (tx_type, count) in s.transaction_types.iter() {
        info!("  {}: {}", tx_type, count);
    }
    info!(
        "  time range: {} .. {}",
        fmt_time(s.time_range.earliest),
        fmt_time(s.time_range.latest)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchOptions;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_enrich_keeps_order_and_duplicates() {
        let raw = vec![
            json!({ "signature": "b", "instructions": [{ "data": "2UzHL" }] }),
            json!({ "signature": "a" }),
            json!({ "signature": "b" }),
        ];

        let txs = enrich(&raw);
        let sigs: Vec<&str> = txs.iter().map(|t| t.signature.as_str()).collect();
        assert_eq!(sigs, vec!["b", "a", "b"]);
        assert_eq!(txs[0].decoded_instruction_count(), 1);
    }

    #[test]
    fn test_fmt_time() {
        assert_eq!(fmt_time(None), "n/a");
        assert_eq!(fmt_time(Some(0)), "1970-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_run_replay() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("saved.json");
        fs::write(
            &input,
            json!([
                { "signature": "s1", "type": "SWAP", "fee": 5000, "meta": { "err": null } },
                { "signature": "s2", "type": "TRANSFER", "transactionError": { "InstructionError": [0, "x"] } }
            ])
            .to_string(),
        )
        .unwrap();

        let cfg = Config {
            address: "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM".to_string(),
            api_key: None,
            api_url: "http://unused".to_string(),
            fetch: FetchOptions::default(),
            output_dir: dir.path().join("out"),
            from_file: Some(input.clone()),
            verbose: false,
        };

        let path = run(&cfg).await.unwrap();
        let v: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(v["metadata"]["endpoint"], input.display().to_string());
        assert_eq!(v["summary"]["successful"], 1);
        assert_eq!(v["summary"]["failed"], 1);
        assert_eq!(v["transactions"][1]["signature"], "s2");
    }

    #[tokio::test]
    async fn test_run_replay_bad_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("saved.json");
        fs::write(&input, "{}").unwrap();

        let out = dir.path().join("out");
        let cfg = Config {
            address: "addr".to_string(),
            api_key: None,
            api_url: "http://unused".to_string(),
            fetch: FetchOptions::default(),
            output_dir: out.clone(),
            from_file: Some(input),
            verbose: false,
        };

        assert!(run(&cfg).await.is_err());
        assert!(!out.exists());
    }
}
