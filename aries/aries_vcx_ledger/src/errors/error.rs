use thiserror::Error as ThisError;

pub type VcxLedgerResult<T> = Result<T, VcxLedgerError>;

/// Failure of a ledger read. Only `LedgerItemNotFound` tells something about the ledger
/// contents, the other variants are failures of the read itself.
#[derive(Debug, ThisError)]
pub enum VcxLedgerError {
    #[error("Ledger item not found")]
    LedgerItemNotFound,
    #[error("Ledger returned an unusable response: {0}")]
    InvalidLedgerResponse(String),
    #[error("Ledger unreachable: {0}")]
    Unreachable(String),
    #[error("Cached ledger response is not valid JSON: {0}")]
    CachedResponse(#[from] serde_json::Error),
    #[error("Invalid ledger option: {0}")]
    InvalidOption(String),
}
