#![allow(clippy::module_inception)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![allow(clippy::large_enum_variant)]

pub mod decorators;
pub mod error;
pub mod misc;
pub mod msg_fields;
pub mod msg_parts;
pub mod msg_types;

use std::str::FromStr;

use derive_more::From;
use msg_fields::protocols::{
    present_proof::v1::{
        ack::AckPresentationV1, present::PresentationV1, propose::ProposePresentationV1,
        request::RequestPresentationV1, PresentProofV1,
    },
    report_problem::ProblemReport,
};
use msg_types::{MessageType, PresentProofTypeV1_0, ReportProblemTypeV1_0};
use serde::{
    de::Error as DeError, ser::Error as SerError, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

/// Enum that can represent any message of the implemented protocols.
///
/// It abstracts away the `@type` field and uses it to determine how
/// to deserialize the input into the correct message type.
///
/// It also automatically appends the correct `@type` field when serializing
/// a message.
#[derive(Clone, Debug, From, PartialEq)]
pub enum AriesMessage {
    PresentProof(PresentProofV1),
    ReportProblem(ProblemReport),
}

impl AriesMessage {
    pub fn msg_type(&self) -> MessageType {
        match self {
            Self::PresentProof(PresentProofV1::ProposePresentation(_)) => {
                PresentProofTypeV1_0::ProposePresentation.into()
            }
            Self::PresentProof(PresentProofV1::RequestPresentation(_)) => {
                PresentProofTypeV1_0::RequestPresentation.into()
            }
            Self::PresentProof(PresentProofV1::Presentation(_)) => {
                PresentProofTypeV1_0::Presentation.into()
            }
            Self::PresentProof(PresentProofV1::Ack(_)) => PresentProofTypeV1_0::Ack.into(),
            Self::ReportProblem(_) => ReportProblemTypeV1_0::ProblemReport.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::PresentProof(PresentProofV1::ProposePresentation(msg)) => &msg.id,
            Self::PresentProof(PresentProofV1::RequestPresentation(msg)) => &msg.id,
            Self::PresentProof(PresentProofV1::Presentation(msg)) => &msg.id,
            Self::PresentProof(PresentProofV1::Ack(msg)) => &msg.id,
            Self::ReportProblem(msg) => &msg.id,
        }
    }
}

impl From<ProposePresentationV1> for AriesMessage {
    fn from(value: ProposePresentationV1) -> Self {
        Self::PresentProof(value.into())
    }
}

impl From<RequestPresentationV1> for AriesMessage {
    fn from(value: RequestPresentationV1) -> Self {
        Self::PresentProof(value.into())
    }
}

impl From<PresentationV1> for AriesMessage {
    fn from(value: PresentationV1) -> Self {
        Self::PresentProof(value.into())
    }
}

impl From<AckPresentationV1> for AriesMessage {
    fn from(value: AckPresentationV1) -> Self {
        Self::PresentProof(value.into())
    }
}

fn with_type<T, E>(msg: &T, msg_type: MessageType) -> Result<Value, E>
where
    T: Serialize,
    E: SerError,
{
    let mut value = serde_json::to_value(msg).map_err(E::custom)?;
    let object = value
        .as_object_mut()
        .ok_or_else(|| E::custom("message did not serialize into an object"))?;
    object.insert("@type".to_owned(), Value::String(msg_type.to_string()));
    Ok(value)
}

impl Serialize for AriesMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let msg_type = self.msg_type();
        let value = match self {
            Self::PresentProof(PresentProofV1::ProposePresentation(msg)) => {
                with_type(msg, msg_type)
            }
            Self::PresentProof(PresentProofV1::RequestPresentation(msg)) => {
                with_type(msg, msg_type)
            }
            Self::PresentProof(PresentProofV1::Presentation(msg)) => with_type(msg, msg_type),
            Self::PresentProof(PresentProofV1::Ack(msg)) => with_type(msg, msg_type),
            Self::ReportProblem(msg) => with_type(msg, msg_type),
        }?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AriesMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = Value::deserialize(deserializer)?;
        let raw_type = value
            .as_object_mut()
            .and_then(|object| object.remove("@type"))
            .ok_or_else(|| D::Error::missing_field("@type"))?;
        let raw_type = raw_type
            .as_str()
            .ok_or_else(|| D::Error::custom("@type must be a string"))?;
        let msg_type = MessageType::from_str(raw_type).map_err(D::Error::custom)?;

        let msg = match msg_type {
            MessageType::PresentProofV1_0(PresentProofTypeV1_0::ProposePresentation) => {
                ProposePresentationV1::deserialize(value).map(Self::from)
            }
            MessageType::PresentProofV1_0(PresentProofTypeV1_0::RequestPresentation) => {
                RequestPresentationV1::deserialize(value).map(Self::from)
            }
            MessageType::PresentProofV1_0(PresentProofTypeV1_0::Presentation) => {
                PresentationV1::deserialize(value).map(Self::from)
            }
            MessageType::PresentProofV1_0(PresentProofTypeV1_0::Ack) => {
                AckPresentationV1::deserialize(value).map(Self::from)
            }
            MessageType::ReportProblemV1_0(ReportProblemTypeV1_0::ProblemReport) => {
                ProblemReport::deserialize(value).map(Self::from)
            }
            MessageType::PresentProofV1_0(PresentProofTypeV1_0::PresentationPreview) => {
                return Err(D::Error::custom(
                    "presentation-preview is not a standalone message",
                ))
            }
        };
        msg.map_err(D::Error::custom)
    }
}
