use proof_exchange::errors::error::{AriesVcxError, AriesVcxErrorKind};

use crate::error::*;

impl From<AriesVcxError> for AgentError {
    fn from(err: AriesVcxError) -> AgentError {
        let kind = match err.kind() {
            AriesVcxErrorKind::InvalidState => AgentErrorKind::InvalidState,
            AriesVcxErrorKind::InvalidInput => AgentErrorKind::InvalidArguments,
            AriesVcxErrorKind::NotFound => AgentErrorKind::NotFound,
            AriesVcxErrorKind::InvalidJson | AriesVcxErrorKind::SerializationError => {
                AgentErrorKind::SerializationError
            }
            AriesVcxErrorKind::MalformedInput => AgentErrorKind::MalformedInput,
            AriesVcxErrorKind::TamperDetected => AgentErrorKind::TamperDetected,
            AriesVcxErrorKind::TemporalViolation => AgentErrorKind::TemporalViolation,
            AriesVcxErrorKind::SelectionFailure => AgentErrorKind::SelectionFailure,
            AriesVcxErrorKind::BackendFailure
            | AriesVcxErrorKind::LedgerItemNotFound
            | AriesVcxErrorKind::CredentialRevoked => AgentErrorKind::BackendFailure,
            AriesVcxErrorKind::ActionNotSupported | AriesVcxErrorKind::UnknownError => {
                AgentErrorKind::GenericAriesVcxError
            }
        };
        error!("AriesVCX Error: {}", err.msg());
        AgentError {
            message: err.msg().to_owned(),
            kind,
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(serde_err: serde_json::Error) -> AgentError {
        let kind = AgentErrorKind::SerializationError;
        let message = format!("(De)serialization failed; err: {:?}", serde_err.to_string());
        AgentError { message, kind }
    }
}
