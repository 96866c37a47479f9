use anoncreds_types::{Error as AnoncredsTypesError, ErrorKind as AnoncredsTypesErrorKind};
use messages::error::MsgTypeError;

use super::error::{AriesVcxError, AriesVcxErrorKind};

impl From<serde_json::Error> for AriesVcxError {
    fn from(err: serde_json::Error) -> Self {
        AriesVcxError::from_msg(AriesVcxErrorKind::SerializationError, err.to_string())
    }
}

impl From<AnoncredsTypesError> for AriesVcxError {
    fn from(err: AnoncredsTypesError) -> Self {
        let kind = match err.kind() {
            AnoncredsTypesErrorKind::ValidationError => AriesVcxErrorKind::MalformedInput,
            AnoncredsTypesErrorKind::ConversionError => AriesVcxErrorKind::SerializationError,
            AnoncredsTypesErrorKind::Input => AriesVcxErrorKind::InvalidInput,
        };
        AriesVcxError::from_msg(kind, err.to_string())
    }
}

impl From<MsgTypeError> for AriesVcxError {
    fn from(value: MsgTypeError) -> Self {
        AriesVcxError::from_msg(AriesVcxErrorKind::InvalidJson, value.to_string())
    }
}
