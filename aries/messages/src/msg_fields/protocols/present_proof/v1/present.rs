use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    decorators::{attachment::Attachment, thread::Thread, timing::Timing},
    msg_parts::MsgParts,
};

pub type PresentationV1 = MsgParts<PresentationV1Content, PresentationV1Decorators>;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct PresentationV1Content {
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "presentations~attach")]
    pub presentations_attach: Vec<Attachment>,
}

/// A presentation always answers a request, so `~thread` is mandatory.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct PresentationV1Decorators {
    #[serde(rename = "~thread")]
    pub thread: Thread,
    #[builder(default, setter(strip_option))]
    #[serde(rename = "~timing")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        decorators::{
            attachment::{AttachmentData, AttachmentType},
            timing::tests::make_extended_timing,
        },
        misc::test_utils,
        msg_types::PresentProofTypeV1_0,
        AriesMessage,
    };

    fn presentation_attachment() -> Attachment {
        let presentation = json!({
            "proof": {"proofs": [], "aggregated_proof": {}},
            "requested_proof": {
                "revealed_attrs": {
                    "attr_name": {"sub_proof_index": 0, "raw": "Alex", "encoded": "1"}
                },
                "self_attested_attrs": {},
                "unrevealed_attrs": {},
                "predicates": {}
            },
            "identifiers": []
        });
        Attachment::builder()
            .id("libindy-presentation-0")
            .mime_type("application/json")
            .data(
                AttachmentData::builder()
                    .content(AttachmentType::Json(presentation))
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_presentation_answering_a_request() {
        let content = PresentationV1Content::builder()
            .comment("as requested")
            .presentations_attach(vec![presentation_attachment()])
            .build();
        let decorators = PresentationV1Decorators::builder()
            .thread(Thread::new("request-1"))
            .timing(make_extended_timing())
            .build();

        let expected = json!({
            "comment": "as requested",
            "presentations~attach": [presentation_attachment()],
            "~thread": {"thid": "request-1"},
            "~timing": decorators.timing
        });

        test_utils::test_msg(content, decorators, PresentProofTypeV1_0::Presentation, expected);
    }

    #[test]
    fn test_presentation_without_thread_is_refused() {
        let raw = json!({
            "@id": "pres-1",
            "@type": "https://didcomm.org/present-proof/1.0/presentation",
            "presentations~attach": [presentation_attachment()]
        });
        assert!(serde_json::from_value::<AriesMessage>(raw).is_err());
    }
}
