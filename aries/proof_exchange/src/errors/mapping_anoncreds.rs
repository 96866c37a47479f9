use aries_vcx_anoncreds::errors::error::VcxAnoncredsError;

use super::error::{AriesVcxError, AriesVcxErrorKind};

impl From<VcxAnoncredsError> for AriesVcxError {
    fn from(err: VcxAnoncredsError) -> Self {
        match err {
            VcxAnoncredsError::CredentialRevoked(_) => {
                Self::from_msg(AriesVcxErrorKind::CredentialRevoked, err.to_string())
            }
            VcxAnoncredsError::InvalidProofRequest(_) => {
                Self::from_msg(AriesVcxErrorKind::MalformedInput, err.to_string())
            }
            VcxAnoncredsError::WalletItemNotFound(_) => {
                Self::from_msg(AriesVcxErrorKind::NotFound, err.to_string())
            }
            VcxAnoncredsError::InvalidJson(_)
            | VcxAnoncredsError::InvalidInput(_)
            | VcxAnoncredsError::InvalidState(_)
            | VcxAnoncredsError::IOError(_)
            | VcxAnoncredsError::UnknownError(_)
            | VcxAnoncredsError::ProofRejected(_)
            | VcxAnoncredsError::UnimplementedFeature(_) => {
                Self::from_msg(AriesVcxErrorKind::BackendFailure, err.to_string())
            }
        }
    }
}
