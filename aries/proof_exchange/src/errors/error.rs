use std::{error::Error, fmt};

use thiserror;

pub mod prelude {
    pub use super::{err_msg, AriesVcxError, AriesVcxErrorKind, VcxResult};
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum AriesVcxErrorKind {
    // Common
    #[error("Object is in invalid state for requested operation")]
    InvalidState,
    #[error("Invalid JSON string")]
    InvalidJson,
    #[error("Invalid input parameter")]
    InvalidInput,
    #[error("Action is not supported")]
    ActionNotSupported,
    #[error("Unable to serialize")]
    SerializationError,
    #[error("Object not found")]
    NotFound,

    // Presentation exchange
    #[error("Proof request or presentation is malformed")]
    MalformedInput,
    #[error("Presentation does not match what was requested or proposed")]
    TamperDetected,
    #[error("Revocation timestamp is not acceptable")]
    TemporalViolation,
    #[error("No credential satisfies the proof request")]
    SelectionFailure,

    // Collaborators
    #[error("Holder, ledger or verification backend failed")]
    BackendFailure,
    #[error("Ledger item not found.")]
    LedgerItemNotFound,
    #[error("Credential has been revoked")]
    CredentialRevoked,

    #[error("Unknown Error")]
    UnknownError,
}

#[derive(thiserror::Error)]
pub struct AriesVcxError {
    msg: String,
    kind: AriesVcxErrorKind,
}

impl fmt::Display for AriesVcxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.msg)?;
        let mut cause = self.source();
        while let Some(err) = cause {
            writeln!(f, "Caused by:\n{}", err)?;
            cause = err.source();
        }
        Ok(())
    }
}

impl fmt::Debug for AriesVcxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self)
    }
}

impl AriesVcxError {
    pub fn from_msg<D>(kind: AriesVcxErrorKind, msg: D) -> AriesVcxError
    where
        D: fmt::Display,
    {
        AriesVcxError {
            msg: msg.to_string(),
            kind,
        }
    }

    pub fn kind(&self) -> AriesVcxErrorKind {
        self.kind
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    /// Appends context on a new line, keeping the kind.
    pub fn extend<D>(self, context: D) -> AriesVcxError
    where
        D: fmt::Display,
    {
        AriesVcxError {
            msg: format!("{}\n{}", self.msg, context),
            kind: self.kind,
        }
    }
}

pub fn err_msg<D>(kind: AriesVcxErrorKind, msg: D) -> AriesVcxError
where
    D: fmt::Display,
{
    AriesVcxError::from_msg(kind, msg)
}

pub type VcxResult<T> = Result<T, AriesVcxError>;

#[cfg(test)]
pub mod unit_tests {
    use super::*;

    #[test]
    fn test_extend_keeps_kind() {
        let err = err_msg(AriesVcxErrorKind::TamperDetected, "encoding mismatch")
            .extend("while checking attr1_referent");
        assert_eq!(err.kind(), AriesVcxErrorKind::TamperDetected);
        assert_eq!(err.msg(), "encoding mismatch\nwhile checking attr1_referent");
    }

    #[test]
    fn test_display_starts_with_message() {
        let err = err_msg(AriesVcxErrorKind::TemporalViolation, "timestamp is in the future");
        assert!(err.to_string().starts_with("Error: timestamp is in the future"));
    }
}
