use proof_exchange::{
    anoncreds_types::{
        data_types::{credential::RequestedCredentials, pres_request::PresentationRequest},
        utils::validation::Validatable,
    },
    aries_vcx_anoncreds::anoncreds::base_anoncreds::{BaseHolder, ZkpVerifier},
    aries_vcx_ledger::ledger::base_ledger::AnoncredsLedgerRead,
    common::proofs::prover::{
        credential_selector::select_credentials_for_request, generate_indy_proof,
    },
    handlers::util::{get_attach_as_json, thread_id_of},
    messages::msg_fields::protocols::present_proof::v1::{
        ack::AckPresentationV1, propose::PresentationPreview, request::RequestPresentationV1,
    },
    protocols::{
        common::build_problem_report_msg,
        proof_presentation::{
            exchange_record::ExchangeRecord,
            prover::{build_presentation_msg, build_proposal_msg},
            state::{ExchangeState, Initiator, Role},
        },
    },
};
use uuid::Uuid;

use super::{ensure_can_move, ensure_role, Correlated, ExchangeManager};
use crate::error::*;

/// Problem report code of a request the prover refuses to answer.
pub const REQUEST_DECLINED_CODE: &str = "request-declined";

impl<L, H, V> ExchangeManager<L, H, V>
where
    L: AnoncredsLedgerRead,
    H: BaseHolder,
    V: ZkpVerifier,
{
    /// Opens an exchange by proposing `preview` to the verifier.
    pub async fn create_exchange_for_proposal(
        &self,
        connection_id: Option<&str>,
        preview: PresentationPreview,
        comment: Option<String>,
    ) -> AgentResult<ExchangeRecord> {
        trace!("create_exchange_for_proposal >>> preview: {:?}", preview);
        let thread_id = Uuid::new_v4().to_string();
        let proposal = build_proposal_msg(&thread_id, preview, comment);

        let mut record = ExchangeRecord::new(
            Role::Prover,
            Initiator::SelfInitiated,
            ExchangeState::ProposalSent,
            thread_id,
            connection_id.map(ToOwned::to_owned),
        )?;
        record.presentation_proposal = Some(proposal.clone());
        let record = self.insert_record(record)?;

        self.send(&record, proposal.into()).await?;
        Ok(record)
    }

    /// Answers a received request with a counter proposal.
    pub async fn create_counter_proposal(
        &self,
        record_id: &str,
        preview: PresentationPreview,
        comment: Option<String>,
    ) -> AgentResult<ExchangeRecord> {
        let mut guard = self.records.lock(record_id).await?;
        let mut record = guard.clone();
        ensure_role(&record, Role::Prover)?;

        record.transition(ExchangeState::ProposalSent)?;
        let proposal = build_proposal_msg(record.thread_id(), preview, comment);
        record.presentation_proposal = Some(proposal.clone());
        let record = self.commit(&mut guard, record)?;

        self.send(&record, proposal.into()).await?;
        Ok(record)
    }

    /// Stores a request from the verifier. A request answering our own proposal continues
    /// that exchange, any other opens a new one.
    pub async fn receive_request(
        &self,
        connection_id: Option<&str>,
        request: RequestPresentationV1,
    ) -> AgentResult<ExchangeRecord> {
        let thread_id = thread_id_of(&request.clone().into());
        trace!("receive_request >>> thread_id: {}", thread_id);
        let proof_req: PresentationRequest =
            get_attach_as_json(&request.content.request_presentations_attach)?;
        proof_req.validate().map_err(|err| {
            AgentError::from_msg(AgentErrorKind::MalformedInput, &err.to_string())
        })?;

        let mut record = ExchangeRecord::new(
            Role::Prover,
            Initiator::External,
            ExchangeState::RequestReceived,
            thread_id,
            connection_id.map(ToOwned::to_owned),
        )?;
        record.presentation_request = Some(request.clone());

        let record = match self.correlate_or_insert(record)? {
            Correlated::Existing(record_id) => {
                let mut guard = self.records.lock(&record_id).await?;
                let mut record = guard.clone();
                record.transition(ExchangeState::RequestReceived)?;
                record.presentation_request = Some(request);
                self.commit(&mut guard, record)?
            }
            Correlated::Created(record) => record,
        };

        if !record.auto_present {
            return Ok(record);
        }
        self.auto_present(record).await
    }

    async fn auto_present(&self, record: ExchangeRecord) -> AgentResult<ExchangeRecord> {
        let proof_req = record.get_presentation_request()?;
        let selected = select_credentials_for_request(
            self.holder.as_ref(),
            &proof_req,
            record.presentation_preview(),
        )
        .await;
        match selected {
            Ok(requested_credentials) => {
                self.create_presentation(record.id(), &requested_credentials, None)
                    .await
            }
            Err(err) => {
                warn!(
                    "Exchange {} left for manual handling, no automatic presentation: {}",
                    record.id(),
                    err.msg()
                );
                Ok(record)
            }
        }
    }

    /// Builds the presentation answering the stored request and sends it.
    ///
    /// Holder and ledger failures abandon the exchange before they are returned.
    pub async fn create_presentation(
        &self,
        record_id: &str,
        requested_credentials: &RequestedCredentials,
        comment: Option<String>,
    ) -> AgentResult<ExchangeRecord> {
        trace!(
            "create_presentation >>> record_id: {}, requested_credentials: {:?}",
            record_id,
            requested_credentials
        );
        let mut guard = self.records.lock(record_id).await?;
        let mut record = guard.clone();
        ensure_role(&record, Role::Prover)?;
        ensure_can_move(&record, ExchangeState::PresentationSent)?;
        let proof_req = record.get_presentation_request()?;

        let presentation = match generate_indy_proof(
            self.ledger_read.as_ref(),
            self.holder.as_ref(),
            &proof_req,
            requested_credentials,
            self.config.tails_dir.as_deref(),
        )
        .await
        {
            Ok(presentation) => presentation,
            Err(err) => {
                warn!(
                    "Exchange {} abandoned, presentation could not be built: {}",
                    record_id,
                    err.msg()
                );
                record.abandon(err.msg())?;
                self.commit(&mut guard, record)?;
                return Err(err.into());
            }
        };

        let msg = build_presentation_msg(record.thread_id(), &presentation, comment)?;
        record.transition(ExchangeState::PresentationSent)?;
        record.presentation = Some(msg.clone());
        let record = self.commit(&mut guard, record)?;

        self.send(&record, msg.into()).await?;
        Ok(record)
    }

    /// Closes the exchange on the verifier's acknowledgement and keeps its verdict.
    pub async fn receive_presentation_ack(
        &self,
        connection_id: Option<&str>,
        ack: AckPresentationV1,
    ) -> AgentResult<ExchangeRecord> {
        let thread_id = ack.decorators.thread.thid.clone();
        trace!("receive_presentation_ack >>> thread_id: {}", thread_id);
        let record_id = self.require_record_id(&thread_id, Some(Role::Prover), connection_id)?;

        let mut guard = self.records.lock(&record_id).await?;
        let mut record = guard.clone();
        record.transition(ExchangeState::PresentationAcked)?;
        record.verification_result = ack.content.verification_result.map(bool::from);
        self.commit(&mut guard, record)
    }

    /// Refuses the stored request and tells the verifier.
    pub async fn decline_request(
        &self,
        record_id: &str,
        reason: Option<&str>,
    ) -> AgentResult<ExchangeRecord> {
        let mut guard = self.records.lock(record_id).await?;
        let mut record = guard.clone();
        ensure_role(&record, Role::Prover)?;
        if record.state() != ExchangeState::RequestReceived {
            return Err(AgentError::from_msg(
                AgentErrorKind::InvalidState,
                &format!(
                    "Exchange {} has no pending request to decline, state is {}",
                    record_id,
                    record.state()
                ),
            ));
        }
        let reason = reason.unwrap_or("Presentation request declined");
        record.abandon(reason)?;
        let record = self.commit(&mut guard, record)?;

        let report =
            build_problem_report_msg(REQUEST_DECLINED_CODE, Some(reason), record.thread_id());
        self.send(&record, report.into()).await?;
        Ok(record)
    }
}
