//! Canonical form of an enhanced (indexer-parsed) transaction.
//!
//! The API payload is loosely typed and fields come and go depending on the
//! transaction type, so everything is read from `serde_json::Value` once here
//! and defaulted. Downstream code can rely on every field being present.

use serde::Serialize;
use serde_json::Value;

use crate::instruction::{Instruction, instructions_from_value};

pub const UNKNOWN: &str = "UNKNOWN";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransfer {
    pub from_user_account: String,
    pub to_user_account: String,
    /// Lamports
    pub amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub from_user_account: String,
    pub to_user_account: String,
    pub from_token_account: String,
    pub to_token_account: String,
    pub mint: String,
    /// UI amount (already scaled by decimals)
    pub token_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_standard: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenAmount {
    /// Base units as a string for precision
    pub token_amount: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceChange {
    pub user_account: String,
    pub token_account: String,
    pub mint: String,
    pub raw_token_amount: RawTokenAmount,
}

/// Per-account balance movement within one transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDelta {
    pub account: String,
    /// Lamports, signed
    pub native_balance_change: i64,
    pub token_balance_changes: Vec<TokenBalanceChange>,
}

/// Higher-level events the indexer recognised. Contents are passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Events {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTransaction {
    pub signature: String,
    pub slot: u64,

    /// Unix seconds
    pub block_time: Option<i64>,

    pub success: bool,

    /// Lamports
    pub fee: u64,

    pub fee_payer: String,
    pub compute_units_consumed: Option<u64>,

    #[serde(rename = "type")]
    pub tx_type: String,

    pub source: String,
    pub description: String,
    pub instructions: Vec<Instruction>,
    pub events: Events,
    pub native_transfers: Vec<NativeTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
    pub account_data: Vec<AccountDelta>,

    /// Original API object, untouched
    pub raw: Value,
}

impl EnhancedTransaction {
    /// Maps one raw API object into the canonical record.
    ///
    /// Never fails: anything missing or of the wrong type gets its default.
    /// Both the enhanced shape (`timestamp`, `transactionError`, top-level
    /// `fee`) and the RPC shape (`blockTime`, `meta.err`, `meta.fee`) are
    /// understood, enhanced fields winning when both exist. Success needs
    /// both error fields to be absent or falsy.
    pub fn from_raw(raw: &Value) -> Self {
        // either error field being truthy marks a failure
        let success = !(raw.get("transactionError").is_some_and(is_truthy)
            || raw.pointer("/meta/err").is_some_and(is_truthy));

        let fee = raw
            .get("fee")
            .and_then(|v| v.as_u64())
            .or_else(|| raw.pointer("/meta/fee").and_then(|v| v.as_u64()))
            .unwrap_or(0);

        let block_time = raw
            .get("timestamp")
            .and_then(|v| v.as_i64())
            .or_else(|| raw.get("blockTime").and_then(|v| v.as_i64()));

        let compute_units_consumed = raw
            .get("computeUnitsConsumed")
            .and_then(|v| v.as_u64())
            .or_else(|| {
                raw.pointer("/meta/computeUnitsConsumed")
                    .and_then(|v| v.as_u64())
            });

        Self {
            signature: str_or(raw, "signature", ""),
            slot: raw.get("slot").and_then(|v| v.as_u64()).unwrap_or(0),
            block_time,
            success,
            fee,
            fee_payer: str_or(raw, "feePayer", ""),
            compute_units_consumed,
            tx_type: str_or(raw, "type", UNKNOWN),
            source: str_or(raw, "source", UNKNOWN),
            description: str_or(raw, "description", ""),
            instructions: instructions_from_value(raw.get("instructions")),
            events: events_from_value(raw.get("events")),
            native_transfers: objects(raw.get("nativeTransfers"), native_transfer),
            token_transfers: objects(raw.get("tokenTransfers"), token_transfer),
            account_data: objects(raw.get("accountData"), account_delta),
            raw: raw.clone(),
        }
    }

    /// Replaces every instruction tree with its decoded copy.
    pub fn with_decoded_instructions(mut self) -> Self {
        self.instructions = self.instructions.iter().map(Instruction::decoded).collect();
        self
    }

    /// Total instruction nodes, inner ones included.
    pub fn instruction_node_count(&self) -> usize {
        self.instructions.iter().map(Instruction::node_count).sum()
    }

    /// Instruction nodes (inner included) carrying decoded data.
    pub fn decoded_instruction_count(&self) -> usize {
        self.instructions.iter().map(Instruction::decoded_count).sum()
    }
}

/// JavaScript-style truthiness for the error field.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn str_or(v: &Value, key: &str, default: &str) -> String {
    v.get(key)
        .and_then(|x| x.as_str())
        .unwrap_or(default)
        .to_string()
}

fn objects<T>(v: Option<&Value>, f: fn(&Value) -> T) -> Vec<T> {
    v.and_then(|x| x.as_array())
        .map(|arr| arr.iter().filter(|x| x.is_object()).map(f).collect())
        .unwrap_or_default()
}

fn native_transfer(v: &Value) -> NativeTransfer {
    NativeTransfer {
        from_user_account: str_or(v, "fromUserAccount", ""),
        to_user_account: str_or(v, "toUserAccount", ""),
        amount: v.get("amount").and_then(|a| a.as_u64()).unwrap_or(0),
    }
}

fn token_transfer(v: &Value) -> TokenTransfer {
    TokenTransfer {
        from_user_account: str_or(v, "fromUserAccount", ""),
        to_user_account: str_or(v, "toUserAccount", ""),
        from_token_account: str_or(v, "fromTokenAccount", ""),
        to_token_account: str_or(v, "toTokenAccount", ""),
        mint: str_or(v, "mint", ""),
        token_amount: v.get("tokenAmount").and_then(|a| a.as_f64()).unwrap_or(0.0),
        token_standard: v
            .get("tokenStandard")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
    }
}

fn account_delta(v: &Value) -> AccountDelta {
    AccountDelta {
        account: str_or(v, "account", ""),
        native_balance_change: v
            .get("nativeBalanceChange")
            .and_then(|n| n.as_i64())
            .unwrap_or(0),
        token_balance_changes: objects(v.get("tokenBalanceChanges"), token_balance_change),
    }
}

fn token_balance_change(v: &Value) -> TokenBalanceChange {
    let raw_amount = v.get("rawTokenAmount");

    TokenBalanceChange {
        user_account: str_or(v, "userAccount", ""),
        token_account: str_or(v, "tokenAccount", ""),
        mint: str_or(v, "mint", ""),
        raw_token_amount: RawTokenAmount {
            token_amount: raw_amount
                .map(|r| str_or(r, "tokenAmount", "0"))
                .unwrap_or_else(|| "0".to_string()),
            decimals: raw_amount
                .and_then(|r| r.get("decimals"))
                .and_then(|d| d.as_u64())
                .and_then(|d| u8::try_from(d).ok())
                .unwrap_or(0),
        },
    }
}

fn events_from_value(v: Option<&Value>) -> Events {
    let member = |key: &str| {
        v.and_then(|e| e.get(key))
            .filter(|x| !x.is_null())
            .cloned()
    };

    Events {
        swap: member("swap"),
        nft: member("nft"),
        compressed: member("compressed"),
    }
}
