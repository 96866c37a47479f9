use thiserror::Error as ThisError;

pub type VcxAnoncredsResult<T> = Result<T, VcxAnoncredsError>;

#[derive(Debug, ThisError)]
pub enum VcxAnoncredsError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Wallet item not found: {0}")]
    WalletItemNotFound(String),
    #[error("Credential revoked: {0}")]
    CredentialRevoked(String),
    #[error("IO error: {0}")]
    IOError(String),
    #[error("Unknown error: {0}")]
    UnknownError(String),
    #[error("Proof rejected: {0}")]
    ProofRejected(String),
    #[error("Invalid proof request: {0}")]
    InvalidProofRequest(String),
    #[error("Unimplemented feature: {0}")]
    UnimplementedFeature(String),
}

impl From<serde_json::Error> for VcxAnoncredsError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

impl From<anoncreds_types::Error> for VcxAnoncredsError {
    fn from(err: anoncreds_types::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
