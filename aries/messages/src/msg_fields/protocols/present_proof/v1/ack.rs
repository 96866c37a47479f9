use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    msg_fields::protocols::notification::ack::{AckContent, AckDecorators},
    msg_parts::MsgParts,
};

pub type AckPresentationV1 = MsgParts<AckPresentationV1Content, AckDecorators>;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct AckPresentationV1Content {
    #[serde(flatten)]
    pub inner: AckContent,
    /// Outcome of the verifier's check, reported back to the prover.
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_result: Option<VerificationResult>,
}

impl From<AckContent> for AckPresentationV1Content {
    fn from(value: AckContent) -> Self {
        Self {
            inner: value,
            verification_result: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationResult {
    True,
    False,
}

impl From<bool> for VerificationResult {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl From<VerificationResult> for bool {
    fn from(value: VerificationResult) -> Self {
        value == VerificationResult::True
    }
}
