use aries_vcx_ledger::errors::error::VcxLedgerError;

use super::error::{AriesVcxError, AriesVcxErrorKind};

impl From<VcxLedgerError> for AriesVcxError {
    fn from(value: VcxLedgerError) -> Self {
        match value {
            VcxLedgerError::LedgerItemNotFound => {
                Self::from_msg(AriesVcxErrorKind::LedgerItemNotFound, value.to_string())
            }
            _ => Self::from_msg(AriesVcxErrorKind::BackendFailure, value.to_string()),
        }
    }
}
