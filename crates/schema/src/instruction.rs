//! Instruction tree as returned by the enhanced transactions API.
//!
//! Each instruction carries its own inner (CPI) instructions, which have the
//! same shape, so the whole thing is an owned tree.

use serde::Serialize;
use serde_json::Value;

use crate::decoded::{DecodedData, decode_base58};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// Account addresses referenced by the instruction, in order
    pub accounts: Vec<String>,

    /// Base-58 encoded instruction data
    pub data: String,

    /// Program that executed this instruction
    pub program_id: String,

    /// Inner instructions invoked by this one
    pub inner_instructions: Vec<Instruction>,

    /// API-supplied parsed form, kept opaque
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Value>,

    /// Filled in by [`Instruction::decoded`]
    pub decoded_data: Option<DecodedData>,
}

impl Instruction {
    /// Best-effort read of one raw instruction object.
    ///
    /// Missing or mistyped fields fall back to empty values; non-string
    /// account entries are skipped.
    pub fn from_value(v: &Value) -> Self {
        let accounts = v
            .get("accounts")
            .and_then(|a| a.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|x| x.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let data = v
            .get("data")
            .and_then(|d| d.as_str())
            .unwrap_or("")
            .to_string();

        let program_id = v
            .get("programId")
            .and_then(|p| p.as_str())
            .unwrap_or("")
            .to_string();

        let inner_instructions = instructions_from_value(v.get("innerInstructions"));

        let parsed = v.get("parsed").filter(|p| !p.is_null()).cloned();

        Self {
            accounts,
            data,
            program_id,
            inner_instructions,
            parsed,
            decoded_data: None,
        }
    }

    /// Returns a copy of this tree with `decoded_data` set on every node.
    pub fn decoded(&self) -> Instruction {
        Instruction {
            accounts: self.accounts.clone(),
            data: self.data.clone(),
            program_id: self.program_id.clone(),
            inner_instructions: self.inner_instructions.iter().map(Self::decoded).collect(),
            parsed: self.parsed.clone(),
            decoded_data: decode_base58(&self.data),
        }
    }

    /// Depth of the tree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .inner_instructions
            .iter()
            .map(Self::depth)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in the tree rooted here.
    pub fn node_count(&self) -> usize {
        1 + self
            .inner_instructions
            .iter()
            .map(Self::node_count)
            .sum::<usize>()
    }

    /// Number of nodes in the tree with decoded data present.
    pub fn decoded_count(&self) -> usize {
        usize::from(self.decoded_data.is_some())
            + self
                .inner_instructions
                .iter()
                .map(Self::decoded_count)
                .sum::<usize>()
    }
}

/// Reads an optional JSON array of instructions, skipping non-object entries.
pub fn instructions_from_value(v: Option<&Value>) -> Vec<Instruction> {
    v.and_then(|x| x.as_array())
        .map(|arr| {
            arr.iter()
                .filter(|ix| ix.is_object())
                .map(Instruction::from_value)
                .collect()
        })
        .unwrap_or_default()
}
