use anoncreds_types::data_types::presentation::Presentation;
use messages::{
    decorators::{thread::Thread, timing::Timing},
    msg_fields::protocols::present_proof::v1::{
        present::{PresentationV1, PresentationV1Content, PresentationV1Decorators},
        propose::{
            PresentationPreview, ProposePresentationV1, ProposePresentationV1Content,
            ProposePresentationV1Decorators,
        },
    },
};
use uuid::Uuid;

use crate::{
    errors::error::prelude::*,
    handlers::util::{make_attach_from_json, AttachmentId},
};

pub fn build_proposal_msg(
    thread_id: &str,
    preview: PresentationPreview,
    comment: Option<String>,
) -> ProposePresentationV1 {
    let id = Uuid::new_v4().to_string();

    let content = ProposePresentationV1Content::builder().presentation_proposal(preview);
    let content = if let Some(comment) = comment {
        content.comment(comment).build()
    } else {
        content.build()
    };

    let decorators = ProposePresentationV1Decorators::builder()
        .thread(Thread::builder().thid(thread_id.to_owned()).build())
        .timing(Timing::now_out())
        .build();

    ProposePresentationV1::builder()
        .id(id)
        .content(content)
        .decorators(decorators)
        .build()
}

pub fn build_presentation_msg(
    thread_id: &str,
    presentation: &Presentation,
    comment: Option<String>,
) -> VcxResult<PresentationV1> {
    let id = Uuid::new_v4().to_string();

    let content = PresentationV1Content::builder().presentations_attach(vec![
        make_attach_from_json(presentation, AttachmentId::Presentation)?,
    ]);
    let content = if let Some(comment) = comment {
        content.comment(comment).build()
    } else {
        content.build()
    };

    let decorators = PresentationV1Decorators::builder()
        .thread(Thread::builder().thid(thread_id.to_owned()).build())
        .timing(Timing::now_out())
        .build();

    Ok(PresentationV1::builder()
        .id(id)
        .content(content)
        .decorators(decorators)
        .build())
}
