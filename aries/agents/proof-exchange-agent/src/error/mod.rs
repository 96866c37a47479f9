mod convertors;

use std::fmt;

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AgentErrorKind {
    #[error("Exchange is not in a state allowing the operation")]
    InvalidState,
    #[error("Invalid arguments")]
    InvalidArguments,
    #[error("Object not found")]
    NotFound,
    #[error("Unable to lock storage")]
    LockError,
    #[error("Serialization error")]
    SerializationError,
    #[error("Malformed proof request or presentation")]
    MalformedInput,
    #[error("Presentation was tampered with")]
    TamperDetected,
    #[error("Unacceptable revocation timestamp")]
    TemporalViolation,
    #[error("No credential satisfies the request")]
    SelectionFailure,
    #[error("Holder, ledger or verifier backend failed")]
    BackendFailure,
    #[error("Failed to deliver message")]
    DeliveryFailure,
    #[error("Generic error")]
    GenericAriesVcxError,
}

#[derive(Debug, thiserror::Error)]
pub struct AgentError {
    pub message: String,
    pub kind: AgentErrorKind,
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl AgentError {
    pub fn from_msg(kind: AgentErrorKind, msg: &str) -> Self {
        AgentError {
            kind,
            message: msg.to_string(),
        }
    }

    pub fn from_kind(kind: AgentErrorKind) -> Self {
        let message = kind.to_string();
        AgentError { message, kind }
    }
}
