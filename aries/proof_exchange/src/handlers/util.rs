use anoncreds_types::{
    data_types::identifiers::cred_def_id::CredentialDefinitionId, utils::encoding::canon,
};
use base64::Engine;
use messages::{
    decorators::attachment::{Attachment, AttachmentData, AttachmentType},
    msg_fields::protocols::present_proof::v1::{propose::PresentationPreview, PresentProofV1},
    AriesMessage,
};
use serde::{de::DeserializeOwned, Serialize};
use strum_macros::{AsRefStr, EnumString};

use crate::{
    errors::error::{AriesVcxError, AriesVcxErrorKind, VcxResult},
    utils::base64::STANDARD_LENIENT,
};

pub const JSON_MIME_TYPE: &str = "application/json";

#[macro_export]
macro_rules! matches_thread_id {
    ($msg:expr, $id:expr) => {
        $msg.decorators.thread.thid == $id || $msg.decorators.thread.pthid.as_deref() == Some($id)
    };
}

/// Messages that may open a thread carry an optional `~thread`; without one the message id
/// is the thread id.
#[macro_export]
macro_rules! matches_opt_thread_id {
    ($msg:expr, $id:expr) => {
        match $msg.decorators.thread.as_ref() {
            Some(t) => t.thid == $id || t.pthid.as_deref() == Some($id),
            None => $msg.id == $id,
        }
    };
}

pub use matches_opt_thread_id;
pub use matches_thread_id;

pub fn verify_thread_id(thread_id: &str, message: &AriesMessage) -> VcxResult<()> {
    let is_match = match message {
        AriesMessage::PresentProof(PresentProofV1::ProposePresentation(msg)) => {
            matches_opt_thread_id!(msg, thread_id)
        }
        AriesMessage::PresentProof(PresentProofV1::RequestPresentation(msg)) => {
            matches_opt_thread_id!(msg, thread_id)
        }
        AriesMessage::PresentProof(PresentProofV1::Presentation(msg)) => {
            matches_thread_id!(msg, thread_id)
        }
        AriesMessage::PresentProof(PresentProofV1::Ack(msg)) => matches_thread_id!(msg, thread_id),
        AriesMessage::ReportProblem(msg) => matches_opt_thread_id!(msg, thread_id),
    };

    if !is_match {
        return Err(AriesVcxError::from_msg(
            AriesVcxErrorKind::InvalidJson,
            format!(
                "Cannot handle message {:?}: thread id does not match, expected {:?}",
                message.msg_type().to_string(),
                thread_id
            ),
        ));
    };

    Ok(())
}

/// Thread a message belongs to: its `~thread.thid`, else its own id.
pub fn thread_id_of(message: &AriesMessage) -> String {
    let thread = match message {
        AriesMessage::PresentProof(msg) => msg.thread(),
        AriesMessage::ReportProblem(msg) => msg.decorators.thread.as_ref(),
    };
    thread
        .map(|thread| thread.thid.clone())
        .unwrap_or_else(|| message.id().to_owned())
}

#[derive(Debug, Clone, Copy, AsRefStr, EnumString, PartialEq)]
pub enum AttachmentId {
    #[strum(serialize = "libindy-request-presentation-0")]
    PresentationRequest,
    #[strum(serialize = "libindy-presentation-0")]
    Presentation,
}

/// Wraps `value` into a base64 JSON attachment.
pub fn make_attach_from_json<T: Serialize>(value: &T, id: AttachmentId) -> VcxResult<Attachment> {
    let json = serde_json::to_vec(value).map_err(|err| {
        AriesVcxError::from_msg(
            AriesVcxErrorKind::SerializationError,
            format!("Cannot serialize {} attachment: {}", id.as_ref(), err),
        )
    })?;
    let data = AttachmentData::builder()
        .content(AttachmentType::Base64(STANDARD_LENIENT.encode(json)))
        .build();
    Ok(Attachment::builder()
        .id(id.as_ref())
        .mime_type(JSON_MIME_TYPE)
        .data(data)
        .build())
}

/// Reads the first attachment as JSON. Base64 and embedded JSON content are both accepted.
pub fn get_attach_as_json<T: DeserializeOwned>(attachments: &[Attachment]) -> VcxResult<T> {
    let malformed =
        |detail: String| AriesVcxError::from_msg(AriesVcxErrorKind::MalformedInput, detail);

    let attach = attachments
        .first()
        .ok_or_else(|| malformed("Message carries no attachment".to_owned()))?;

    match &attach.data.content {
        AttachmentType::Base64(encoded) => {
            let bytes = STANDARD_LENIENT.decode(encoded).map_err(|err| {
                malformed(format!("Attachment is not valid base64: {}", err))
            })?;
            serde_json::from_slice(&bytes)
                .map_err(|err| malformed(format!("Attachment is not the expected JSON: {}", err)))
        }
        AttachmentType::Json(value) => serde_json::from_value(value.clone())
            .map_err(|err| malformed(format!("Attachment is not the expected JSON: {}", err))),
    }
}

/// Whether the preview proposes attribute `name` with `value` from credential definition
/// `cred_def_id`. A preview attribute without a value matches any value; one without a
/// credential definition matches nothing.
pub fn preview_has_attr_spec(
    preview: &PresentationPreview,
    cred_def_id: &CredentialDefinitionId,
    name: &str,
    value: &str,
) -> bool {
    let name = canon(name);
    preview.attributes.iter().any(|attr| {
        canon(&attr.name) == name
            && attr.value.as_deref().map_or(true, |proposed| proposed == value)
            && attr.cred_def_id.as_deref() == Some(cred_def_id.0.as_str())
    })
}

/// Whether the preview proposes a predicate on `name`, bound to `cred_def_id` when the
/// preview names one.
pub fn preview_has_pred_spec(
    preview: &PresentationPreview,
    cred_def_id: &CredentialDefinitionId,
    name: &str,
) -> bool {
    let name = canon(name);
    preview.predicates.iter().any(|pred| {
        canon(&pred.name) == name
            && pred
                .cred_def_id
                .as_deref()
                .map_or(true, |proposed| proposed == cred_def_id.0)
    })
}
