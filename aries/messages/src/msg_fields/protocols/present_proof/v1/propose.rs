use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use typed_builder::TypedBuilder;

use crate::{
    decorators::{thread::Thread, timing::Timing},
    msg_parts::MsgParts,
    msg_types::{MessageType, PresentProofTypeV1_0},
};

pub type ProposePresentationV1 =
    MsgParts<ProposePresentationV1Content, ProposePresentationV1Decorators>;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct ProposePresentationV1Content {
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub presentation_proposal: PresentationPreview,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq, TypedBuilder)]
pub struct ProposePresentationV1Decorators {
    #[builder(default, setter(strip_option))]
    #[serde(rename = "~thread")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[builder(default, setter(strip_option))]
    #[serde(rename = "~timing")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
}

/// Attribute values and predicates the prover intends to disclose.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PresentationPreview {
    #[serde(rename = "@type")]
    msg_type: PresentationPreviewMsgType,
    #[serde(default)]
    pub attributes: Vec<PresentationAttr>,
    #[serde(default)]
    pub predicates: Vec<Predicate>,
}

impl PresentationPreview {
    pub fn new(attributes: Vec<PresentationAttr>, predicates: Vec<Predicate>) -> Self {
        Self {
            msg_type: PresentationPreviewMsgType,
            attributes,
            predicates,
        }
    }
}

/// `@type` of a preview embedded in a proposal; previews never travel alone.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct PresentationPreviewMsgType;

impl Serialize for PresentationPreviewMsgType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MessageType::from(PresentProofTypeV1_0::PresentationPreview)
            .to_string()
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PresentationPreviewMsgType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match MessageType::from_str(&raw).map_err(serde::de::Error::custom)? {
            MessageType::PresentProofV1_0(PresentProofTypeV1_0::PresentationPreview) => {
                Ok(PresentationPreviewMsgType)
            }
            other => Err(serde::de::Error::custom(format!(
                "message kind is not presentation-preview: {other}"
            ))),
        }
    }
}

/// A proposed attribute. Without `value` the prover only announces it will disclose it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, TypedBuilder)]
pub struct PresentationAttr {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cred_def_id: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "mime-type")]
    pub mime_type: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referent: Option<String>,
}

/// A proposed `name <op> threshold` claim.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, TypedBuilder)]
pub struct Predicate {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cred_def_id: Option<String>,
    pub predicate: PredicateOperator,
    pub threshold: i64,
}

#[derive(Copy, Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub enum PredicateOperator {
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
}
