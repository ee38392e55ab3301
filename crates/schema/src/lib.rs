pub mod decoded;
pub mod enhanced_tx;
pub mod export;
pub mod instruction;
pub mod summary;

// Base-58 decoding
pub use decoded::{DecodedData, decode_base58};

// Canonical transaction record
pub use enhanced_tx::{
    AccountDelta, EnhancedTransaction, Events, NativeTransfer, RawTokenAmount,
    TokenBalanceChange, TokenTransfer, UNKNOWN,
};

// Instruction tree
pub use instruction::Instruction;

// Aggregation
pub use summary::{Summary, TimeRange, TypeCounts};

// Export document
pub use export::{EXPORT_FORMAT_VERSION, EXPORT_SOURCE, ExportArtifact, ExportMetadata};
