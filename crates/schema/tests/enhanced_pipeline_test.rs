//! Enhanced transaction pipeline tests
//!
//! Runs a recorded API response through normalize → decode → summarize →
//! export assembly and checks the result field by field.

use serde_json::Value;
use std::fs;

use schema::{EnhancedTransaction, Events, ExportArtifact, Summary, UNKNOWN};

const FIXTURES_DIR: &str = "tests/fixtures";

const SWAP_SIG: &str =
    "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqokgpiKRLuS83KUxyZyv2sUYv";
const WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

fn load_fixture(name: &str) -> Value {
    let path = format!("{}/{}.json", FIXTURES_DIR, name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path, e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path, e))
}

fn load_batch() -> Vec<EnhancedTransaction> {
    load_fixture("enhanced_batch")
        .as_array()
        .expect("fixture is an array")
        .iter()
        .map(EnhancedTransaction::from_raw)
        .map(EnhancedTransaction::with_decoded_instructions)
        .collect()
}

#[test]
fn test_swap_record_fields() {
    let txs = load_batch();
    let swap = &txs[0];

    assert_eq!(swap.signature, SWAP_SIG);
    assert_eq!(swap.slot, 250000100);
    assert_eq!(swap.block_time, Some(1703001200));
    assert!(swap.success);
    assert_eq!(swap.fee, 5000);
    assert_eq!(swap.fee_payer, WALLET);
    assert_eq!(swap.compute_units_consumed, Some(84211));
    assert_eq!(swap.tx_type, "SWAP");
    assert_eq!(swap.source, "JUPITER");
    assert_eq!(swap.native_transfers.len(), 1);
    assert_eq!(swap.token_transfers.len(), 1);
    assert_eq!(swap.account_data.len(), 2);
    assert!(swap.events.swap.is_some());
    assert!(swap.events.nft.is_none());
}

#[test]
fn test_nested_instructions_decoded() {
    let txs = load_batch();
    let swap = &txs[0];

    // compute budget ix has empty data
    assert!(swap.instructions[0].decoded_data.is_none());
    assert!(swap.instructions[0].inner_instructions.is_empty());

    let route = &swap.instructions[1];
    assert_eq!(route.depth(), 3);
    assert_eq!(route.decoded_data.as_ref().unwrap().decoded_hex, "ffffff");

    let system = &route.inner_instructions[0];
    let d = system.decoded_data.as_ref().unwrap();
    assert_eq!(d.data_length, 12);
    assert_eq!(d.decoded_hex, "02000000f01d1f0000000000");
    // leaf with no innerInstructions key still gets an empty list
    assert!(system.inner_instructions.is_empty());

    let token = &route.inner_instructions[1];
    assert_eq!(token.decoded_data.as_ref().unwrap().decoded_bytes[0], 3);

    let log_ix = &token.inner_instructions[0];
    assert!(log_ix.decoded_data.is_none());

    assert_eq!(swap.instruction_node_count(), 5);
    assert_eq!(swap.decoded_instruction_count(), 3);
}

#[test]
fn test_failed_and_sparse_records() {
    let txs = load_batch();

    let failed = &txs[1];
    assert!(!failed.success);
    assert_eq!(failed.tx_type, "TRANSFER");
    assert_eq!(failed.events, Events::default());

    let sparse = &txs[2];
    assert!(sparse.success);
    assert_eq!(sparse.tx_type, UNKNOWN);
    assert_eq!(sparse.source, UNKNOWN);
    assert!(sparse.block_time.is_none());
    assert!(sparse.instructions.is_empty());
}

#[test]
fn test_batch_summary() {
    let txs = load_batch();
    let s = Summary::from_transactions(&txs);

    assert_eq!(s.successful, 2);
    assert_eq!(s.failed, 1);
    assert_eq!(s.total(), txs.len() as u64);
    assert_eq!(s.total_fees, 20000);
    assert_eq!(s.total_compute_units, 84211);
    assert_eq!(s.transaction_types.iter().count(), 3);
    assert_eq!(s.transaction_types.get("SWAP"), Some(1));
    assert_eq!(s.transaction_types.get("TRANSFER"), Some(1));
    assert_eq!(s.transaction_types.get(UNKNOWN), Some(1));

    // third record has no timestamp
    assert_eq!(s.time_range.earliest, Some(0));
    assert_eq!(s.time_range.latest, Some(1703001200));
}

#[test]
fn test_decoding_twice_is_stable() {
    let once = load_batch();
    let twice: Vec<EnhancedTransaction> = once
        .iter()
        .cloned()
        .map(EnhancedTransaction::with_decoded_instructions)
        .collect();

    assert_eq!(once, twice);
}

#[test]
fn test_export_document() {
    let txs = load_batch();
    let artifact = ExportArtifact::new(
        WALLET,
        "https://api.helius.xyz/v0",
        "2024-01-01T00:00:00.000Z",
        &txs,
    );

    let v = serde_json::to_value(&artifact).unwrap();

    assert_eq!(v["metadata"]["address"], WALLET);
    assert_eq!(v["metadata"]["transactionCount"], 3);
    assert_eq!(v["summary"]["transactionTypes"]["SWAP"], 1);

    let first = &v["transactions"][0];
    assert_eq!(first["signature"], SWAP_SIG);
    assert_eq!(
        first["instructions"][1]["innerInstructions"][0]["decodedData"]["dataLength"],
        12
    );
    assert_eq!(first["raw"]["source"], "JUPITER");

    // raw payload is kept verbatim, no decodedData leaks into it
    assert!(first["raw"]["instructions"][1].get("decodedData").is_none());
}
