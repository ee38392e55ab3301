//! On-disk export document: metadata + summary + transactions.

use serde::Serialize;

use crate::enhanced_tx::EnhancedTransaction;
use crate::summary::Summary;

pub const EXPORT_SOURCE: &str = "Helius Enhanced Transactions API";
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// RFC 3339 UTC time the data was fetched
    pub fetched_at: String,
    pub address: String,
    pub transaction_count: usize,
    pub source: String,
    /// API endpoint, or the input file in replay mode
    pub endpoint: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ExportArtifact<'a> {
    pub metadata: ExportMetadata,
    pub summary: Summary,
    pub transactions: &'a [EnhancedTransaction],
}

impl<'a> ExportArtifact<'a> {
    /// Assembles the document. The summary is always recomputed from
    /// `transactions`.
    pub fn new(
        address: &str,
        endpoint: &str,
        fetched_at: &str,
        transactions: &'a [EnhancedTransaction],
    ) -> Self {
        Self {
            metadata: ExportMetadata {
                fetched_at: fetched_at.to_string(),
                address: address.to_string(),
                transaction_count: transactions.len(),
                source: EXPORT_SOURCE.to_string(),
                endpoint: endpoint.to_string(),
                version: EXPORT_FORMAT_VERSION.to_string(),
            },
            summary: Summary::from_transactions(transactions),
            transactions,
        }
    }
}
