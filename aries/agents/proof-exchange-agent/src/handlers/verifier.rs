use proof_exchange::{
    anoncreds_types::{
        data_types::{pres_request::PresentationRequest, presentation::Presentation},
        utils::validation::Validatable,
    },
    aries_vcx_anoncreds::anoncreds::base_anoncreds::{BaseHolder, ZkpVerifier},
    aries_vcx_ledger::ledger::base_ledger::AnoncredsLedgerRead,
    common::proofs::verifier::{
        check_presentation_against_preview, verifier_internal::build_verification_inputs,
        verify_presentation, VerificationMessage,
    },
    handlers::util::{get_attach_as_json, thread_id_of},
    messages::msg_fields::protocols::present_proof::v1::{
        present::PresentationV1, propose::ProposePresentationV1,
    },
    protocols::{
        common::build_problem_report_msg,
        proof_presentation::{
            exchange_record::ExchangeRecord,
            state::{ExchangeState, Initiator, Role},
            verifier::{build_ack_msg, build_request_msg, request_from_preview},
        },
    },
};
use uuid::Uuid;

use super::{ensure_can_move, ensure_role, Correlated, ExchangeManager};
use crate::error::*;

/// Problem report code of a presentation rejected before the cryptographic check.
pub const PRESENTATION_REJECTED_CODE: &str = "presentation-rejected";

impl<L, H, V> ExchangeManager<L, H, V>
where
    L: AnoncredsLedgerRead,
    H: BaseHolder,
    V: ZkpVerifier,
{
    /// Stores a proposal from a prover. A proposal on a thread we already requested on is
    /// a counter proposal and continues that exchange.
    pub async fn receive_proposal(
        &self,
        connection_id: Option<&str>,
        proposal: ProposePresentationV1,
    ) -> AgentResult<ExchangeRecord> {
        let thread_id = thread_id_of(&proposal.clone().into());
        trace!("receive_proposal >>> thread_id: {}", thread_id);

        let mut record = ExchangeRecord::new(
            Role::Verifier,
            Initiator::External,
            ExchangeState::ProposalReceived,
            thread_id,
            connection_id.map(ToOwned::to_owned),
        )?;
        record.presentation_proposal = Some(proposal.clone());

        match self.correlate_or_insert(record)? {
            Correlated::Existing(record_id) => {
                let mut guard = self.records.lock(&record_id).await?;
                let mut record = guard.clone();
                record.transition(ExchangeState::ProposalReceived)?;
                record.presentation_proposal = Some(proposal);
                self.commit(&mut guard, record)
            }
            Correlated::Created(record) => Ok(record),
        }
    }

    /// Sends a request derived from the stored proposal, under a fresh nonce.
    pub async fn create_bound_request(
        &self,
        record_id: &str,
        name: Option<&str>,
        comment: Option<String>,
    ) -> AgentResult<ExchangeRecord> {
        let mut guard = self.records.lock(record_id).await?;
        let mut record = guard.clone();
        ensure_role(&record, Role::Verifier)?;
        ensure_can_move(&record, ExchangeState::RequestSent)?;
        let preview = record.presentation_preview().ok_or_else(|| {
            AgentError::from_msg(
                AgentErrorKind::InvalidState,
                &format!("Exchange {} holds no proposal to bind to", record_id),
            )
        })?;

        let proof_req = request_from_preview(preview, name)?;
        let request = build_request_msg(record.thread_id(), &proof_req, comment)?;
        record.transition(ExchangeState::RequestSent)?;
        record.presentation_request = Some(request.clone());
        let record = self.commit(&mut guard, record)?;

        self.send(&record, request.into()).await?;
        Ok(record)
    }

    /// Opens an exchange by sending `proof_req` as is.
    pub async fn create_exchange_for_request(
        &self,
        connection_id: Option<&str>,
        proof_req: &PresentationRequest,
        comment: Option<String>,
    ) -> AgentResult<ExchangeRecord> {
        trace!("create_exchange_for_request >>> proof_req: {:?}", proof_req);
        proof_req.validate().map_err(|err| {
            AgentError::from_msg(AgentErrorKind::MalformedInput, &err.to_string())
        })?;
        let thread_id = Uuid::new_v4().to_string();
        let request = build_request_msg(&thread_id, proof_req, comment)?;

        let mut record = ExchangeRecord::new(
            Role::Verifier,
            Initiator::SelfInitiated,
            ExchangeState::RequestSent,
            thread_id,
            connection_id.map(ToOwned::to_owned),
        )?;
        record.presentation_request = Some(request.clone());
        let record = self.insert_record(record)?;

        self.send(&record, request.into()).await?;
        Ok(record)
    }

    /// Stores a presentation for the exchange on its thread.
    ///
    /// When the exchange started from a proposal, every disclosed value must be one the
    /// proposal announced. A mismatch is returned as `TamperDetected` and the record stays
    /// where it was.
    pub async fn receive_presentation(
        &self,
        connection_id: Option<&str>,
        presentation: PresentationV1,
        thread_id_override: Option<&str>,
    ) -> AgentResult<ExchangeRecord> {
        let thread_id = thread_id_override
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| presentation.decorators.thread.thid.clone());
        trace!("receive_presentation >>> thread_id: {}", thread_id);
        let record_id = self.require_record_id(&thread_id, Some(Role::Verifier), connection_id)?;

        let record = {
            let mut guard = self.records.lock(&record_id).await?;
            let mut record = guard.clone();
            ensure_can_move(&record, ExchangeState::PresentationReceived)?;

            let parsed: Presentation =
                get_attach_as_json(&presentation.content.presentations_attach)?;
            if let Some(preview) = record.presentation_preview() {
                let proof_req = record.get_presentation_request()?;
                if let Err(err) = check_presentation_against_preview(&proof_req, &parsed, preview) {
                    warn!(
                        "Exchange {} received a presentation not matching its proposal: {}",
                        record_id,
                        err.msg()
                    );
                    return Err(err.into());
                }
            }

            record.transition(ExchangeState::PresentationReceived)?;
            record.presentation = Some(presentation);
            self.commit(&mut guard, record)?
        };

        if !record.auto_verify {
            return Ok(record);
        }
        self.verify_presentation(record.id()).await
    }

    /// Verifies the stored presentation and acknowledges it with the verdict.
    ///
    /// A negative verdict is a normal outcome. A malformed, tampered or badly timestamped
    /// presentation abandons the exchange, is reported to the prover and returned as an error.
    pub async fn verify_presentation(&self, record_id: &str) -> AgentResult<ExchangeRecord> {
        trace!("verify_presentation >>> record_id: {}", record_id);
        let mut guard = self.records.lock(record_id).await?;
        let mut record = guard.clone();
        ensure_role(&record, Role::Verifier)?;
        ensure_can_move(&record, ExchangeState::Verified)?;
        let proof_req = record.get_presentation_request()?;
        let presentation = record.get_presentation()?;

        let inputs = build_verification_inputs(
            self.ledger_read.as_ref(),
            &presentation,
            self.config.clock_skew_secs,
        )
        .await?;

        let outcome = match verify_presentation(
            self.verifier.as_ref(),
            &proof_req,
            &presentation,
            &inputs,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                record.verified = Some(false);
                record
                    .verified_msgs
                    .push(VerificationMessage::ValueError(err.msg().to_owned()));
                record.abandon(err.msg())?;
                let record = self.commit(&mut guard, record)?;

                let report = build_problem_report_msg(
                    PRESENTATION_REJECTED_CODE,
                    Some(err.msg()),
                    record.thread_id(),
                );
                self.send(&record, report.into()).await?;
                return Err(err.into());
            }
        };

        let verified = outcome.verified;
        record.record_verification(outcome);
        record.transition(ExchangeState::Verified)?;
        let record = self.commit(&mut guard, record)?;

        self.send(&record, build_ack_msg(record.thread_id(), verified).into())
            .await?;
        Ok(record)
    }
}
