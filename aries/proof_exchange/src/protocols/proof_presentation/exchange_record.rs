use anoncreds_types::data_types::{pres_request::PresentationRequest, presentation::Presentation};
use chrono::{DateTime, Utc};
use messages::msg_fields::protocols::present_proof::v1::{
    present::PresentationV1,
    propose::{PresentationPreview, ProposePresentationV1},
    request::RequestPresentationV1,
};
use uuid::Uuid;

use super::{
    state::{ExchangeState, Initiator, Role},
    verification_status::PresentationVerificationStatus,
};
use crate::{
    common::proofs::verifier::{VerificationMessage, VerificationOutcome},
    errors::error::prelude::*,
    handlers::util::get_attach_as_json,
};

/// Everything known about one presentation exchange.
///
/// Identity, role and state only change through the methods below. The state moves along
/// [ExchangeState::can_transition] only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRecord {
    id: String,
    connection_id: Option<String>,
    thread_id: String,
    role: Role,
    initiator: Initiator,
    state: ExchangeState,
    pub presentation_proposal: Option<ProposePresentationV1>,
    pub presentation_request: Option<RequestPresentationV1>,
    pub presentation: Option<PresentationV1>,
    pub verified: Option<bool>,
    #[serde(default)]
    pub verified_msgs: Vec<VerificationMessage>,
    pub auto_present: bool,
    pub auto_verify: bool,
    pub auto_remove: bool,
    pub error_msg: Option<String>,
    /// Verdict the verifier reported in its acknowledgement.
    pub verification_result: Option<bool>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExchangeRecord {
    pub fn new(
        role: Role,
        initiator: Initiator,
        state: ExchangeState,
        thread_id: impl Into<String>,
        connection_id: Option<String>,
    ) -> VcxResult<Self> {
        if !state.is_initial(role) {
            return Err(AriesVcxError::from_msg(
                AriesVcxErrorKind::InvalidState,
                format!("A {} exchange cannot start in state {}", role, state),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            connection_id,
            thread_id: thread_id.into(),
            role,
            initiator,
            state,
            presentation_proposal: None,
            presentation_request: None,
            presentation: None,
            verified: None,
            verified_msgs: Vec::new(),
            auto_present: false,
            auto_verify: false,
            auto_remove: false,
            error_msg: None,
            verification_result: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn initiator(&self) -> Initiator {
        self.initiator
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the record to `next`. A transition outside the table leaves the record as is.
    pub fn transition(&mut self, next: ExchangeState) -> VcxResult<()> {
        if !self.state.can_transition(self.role, next) {
            warn!(
                "Exchange {} ({}) rejected transition {} -> {}",
                self.id, self.role, self.state, next
            );
            return Err(AriesVcxError::from_msg(
                AriesVcxErrorKind::InvalidState,
                format!(
                    "Exchange {} cannot move from {} to {} as {}",
                    self.id, self.state, next, self.role
                ),
            ));
        }
        self.state = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn abandon(&mut self, reason: impl Into<String>) -> VcxResult<()> {
        self.transition(ExchangeState::Abandoned)?;
        self.error_msg = Some(reason.into());
        Ok(())
    }

    pub fn record_verification(&mut self, outcome: VerificationOutcome) {
        self.verified = Some(outcome.verified);
        self.verified_msgs = outcome.messages;
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn verification_status(&self) -> PresentationVerificationStatus {
        self.verified.into()
    }

    pub fn presentation_preview(&self) -> Option<&PresentationPreview> {
        self.presentation_proposal
            .as_ref()
            .map(|proposal| &proposal.content.presentation_proposal)
    }

    pub fn get_presentation_request(&self) -> VcxResult<PresentationRequest> {
        let request = self.presentation_request.as_ref().ok_or_else(|| {
            AriesVcxError::from_msg(
                AriesVcxErrorKind::NotFound,
                format!("Exchange {} holds no presentation request", self.id),
            )
        })?;
        get_attach_as_json(&request.content.request_presentations_attach)
    }

    pub fn get_presentation(&self) -> VcxResult<Presentation> {
        let presentation = self.presentation.as_ref().ok_or_else(|| {
            AriesVcxError::from_msg(
                AriesVcxErrorKind::NotFound,
                format!("Exchange {} holds no presentation", self.id),
            )
        })?;
        get_attach_as_json(&presentation.content.presentations_attach)
    }
}
