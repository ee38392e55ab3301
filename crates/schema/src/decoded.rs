//! Base-58 instruction data decoding.

use serde::Serialize;

/// Decoded form of an instruction's base-58 `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedData {
    /// The base-58 string exactly as received
    pub original_data: String,

    /// Lowercase hex of the decoded bytes
    pub decoded_hex: String,

    /// Raw decoded bytes
    pub decoded_bytes: Vec<u8>,

    /// Number of decoded bytes
    pub data_length: usize,
}

/// Decodes a base-58 string.
///
/// Returns `None` for empty or whitespace-only input and for anything that is
/// not valid base-58. Undecodable data is normal for some programs and is not
/// treated as an error.
pub fn decode_base58(data: &str) -> Option<DecodedData> {
    if data.trim().is_empty() {
        return None;
    }

    let bytes = bs58::decode(data).into_vec().ok()?;

    Some(DecodedData {
        original_data: data.to_string(),
        decoded_hex: hex::encode(&bytes),
        data_length: bytes.len(),
        decoded_bytes: bytes,
    })
}
