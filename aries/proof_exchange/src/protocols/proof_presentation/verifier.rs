use std::collections::HashMap;

use anoncreds_types::data_types::{
    nonce::Nonce,
    pres_request::{AttributeInfo, PredicateInfo, PredicateTypes, PresentationRequest},
};
use messages::{
    decorators::{thread::Thread, timing::Timing},
    msg_fields::protocols::{
        notification::ack::{AckContent, AckDecorators, AckStatus},
        present_proof::v1::{
            ack::{AckPresentationV1, AckPresentationV1Content},
            propose::{PredicateOperator, PresentationPreview},
            request::{
                RequestPresentationV1, RequestPresentationV1Content,
                RequestPresentationV1Decorators,
            },
        },
    },
};
use uuid::Uuid;

use crate::{
    errors::error::prelude::*,
    handlers::util::{make_attach_from_json, AttachmentId},
};

const DERIVED_REQUEST_NAME: &str = "Proof request";
const DERIVED_REQUEST_VERSION: &str = "1.0";

pub fn build_request_msg(
    thread_id: &str,
    proof_req: &PresentationRequest,
    comment: Option<String>,
) -> VcxResult<RequestPresentationV1> {
    let id = Uuid::new_v4().to_string();

    let content = RequestPresentationV1Content::builder().request_presentations_attach(vec![
        make_attach_from_json(proof_req, AttachmentId::PresentationRequest)?,
    ]);
    let content = if let Some(comment) = comment {
        content.comment(comment).build()
    } else {
        content.build()
    };

    let decorators = RequestPresentationV1Decorators::builder()
        .thread(Thread::builder().thid(thread_id.to_owned()).build())
        .timing(Timing::now_out())
        .build();

    Ok(RequestPresentationV1::builder()
        .id(id)
        .content(content)
        .decorators(decorators)
        .build())
}

/// Acknowledgement of a verified presentation, reporting the verdict to the prover.
pub fn build_ack_msg(thread_id: &str, verified: bool) -> AckPresentationV1 {
    let id = Uuid::new_v4().to_string();

    let content = AckPresentationV1Content::builder()
        .inner(AckContent::builder().status(AckStatus::Ok).build())
        .verification_result(verified.into())
        .build();

    let decorators = AckDecorators::builder()
        .thread(Thread::builder().thid(thread_id.to_owned()).build())
        .timing(Timing::now_out())
        .build();

    AckPresentationV1::builder()
        .id(id)
        .content(content)
        .decorators(decorators)
        .build()
}

fn predicate_type(operator: PredicateOperator) -> PredicateTypes {
    match operator {
        PredicateOperator::GreaterOrEqual => PredicateTypes::GE,
        PredicateOperator::GreaterThan => PredicateTypes::GT,
        PredicateOperator::LessOrEqual => PredicateTypes::LE,
        PredicateOperator::LessThan => PredicateTypes::LT,
    }
}

fn cred_def_restriction(cred_def_id: Option<&str>) -> Option<serde_json::Value> {
    cred_def_id.map(|cred_def_id| json!([{ "cred_def_id": cred_def_id }]))
}

/// Proof request asking for exactly what `preview` proposes, under a fresh nonce.
///
/// Every attribute and predicate gets its own uuid referent. Entries naming a credential
/// definition are restricted to it.
pub fn request_from_preview(
    preview: &PresentationPreview,
    name: Option<&str>,
) -> VcxResult<PresentationRequest> {
    trace!("request_from_preview >>> preview: {:?}", preview);

    let requested_attributes: HashMap<String, AttributeInfo> = preview
        .attributes
        .iter()
        .map(|attr| {
            let info = AttributeInfo {
                name: Some(attr.name.clone()),
                restrictions: cred_def_restriction(attr.cred_def_id.as_deref()),
                ..Default::default()
            };
            (Uuid::new_v4().to_string(), info)
        })
        .collect();

    let requested_predicates = preview
        .predicates
        .iter()
        .map(|pred| {
            let p_value = i32::try_from(pred.threshold).map_err(|_| {
                AriesVcxError::from_msg(
                    AriesVcxErrorKind::MalformedInput,
                    format!(
                        "Threshold {} of proposed predicate on {} is out of range",
                        pred.threshold, pred.name
                    ),
                )
            })?;
            let info = PredicateInfo {
                name: pred.name.clone(),
                p_type: predicate_type(pred.predicate),
                p_value,
                restrictions: cred_def_restriction(pred.cred_def_id.as_deref()),
                non_revoked: None,
            };
            Ok((Uuid::new_v4().to_string(), info))
        })
        .collect::<VcxResult<HashMap<String, PredicateInfo>>>()?;

    Ok(PresentationRequest::builder()
        .nonce(Nonce::new()?)
        .name(name.unwrap_or(DERIVED_REQUEST_NAME))
        .version(DERIVED_REQUEST_VERSION)
        .requested_attributes(requested_attributes)
        .requested_predicates(requested_predicates)
        .build())
}
