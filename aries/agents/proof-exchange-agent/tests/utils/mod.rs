#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use proof_exchange_agent::{
    proof_exchange::{
        anoncreds_types::data_types::presentation::Presentation,
        handlers::util::{get_attach_as_json, make_attach_from_json, AttachmentId},
        messages::{
            msg_fields::protocols::{
                present_proof::v1::{
                    ack::AckPresentationV1, present::PresentationV1,
                    propose::ProposePresentationV1, request::RequestPresentationV1,
                    PresentProofV1,
                },
                report_problem::ProblemReport,
            },
            AriesMessage,
        },
    },
    AgentResult, ExchangeConfig, ExchangeManager, Responder,
};
use test_utils::mockdata::{
    mock_holder::MockHolder, mock_ledger::MockLedger, mock_verifier::MockZkpVerifier,
};

mock! {
    pub Responder {}

    #[async_trait]
    impl Responder for Responder {
        async fn send_message(
            &self,
            message: AriesMessage,
            connection_id: Option<String>,
        ) -> AgentResult<()>;
    }
}

pub type TestManager = ExchangeManager<MockLedger, MockHolder, MockZkpVerifier>;

pub const CONNECTION_ID: &str = "connection-1";

/// Messages a manager handed to its responder, oldest first.
#[derive(Clone, Default)]
pub struct Outbox {
    sent: Arc<Mutex<Vec<(AriesMessage, Option<String>)>>>,
}

impl Outbox {
    pub fn responder(&self) -> Arc<MockResponder> {
        let sent = self.sent.clone();
        let mut responder = MockResponder::new();
        responder
            .expect_send_message()
            .returning(move |message, connection_id| {
                sent.lock().unwrap().push((message, connection_id));
                Ok(())
            });
        Arc::new(responder)
    }

    pub fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Removes and returns the oldest message, checking it went to [CONNECTION_ID].
    pub fn pop(&self) -> AriesMessage {
        let mut sent = self.sent.lock().unwrap();
        assert!(!sent.is_empty(), "nothing was sent");
        let (message, connection_id) = sent.remove(0);
        assert_eq!(connection_id.as_deref(), Some(CONNECTION_ID));
        message
    }
}

pub struct Party {
    pub manager: Arc<TestManager>,
    pub outbox: Outbox,
    pub ledger: Arc<MockLedger>,
    pub holder: Arc<MockHolder>,
    pub zkp: Arc<MockZkpVerifier>,
}

pub fn party(
    ledger: MockLedger,
    holder: MockHolder,
    verifier: MockZkpVerifier,
    config: ExchangeConfig,
) -> Party {
    test_utils::logger::init_logger();
    let outbox = Outbox::default();
    let (ledger, holder, zkp) = (Arc::new(ledger), Arc::new(holder), Arc::new(verifier));
    let manager = ExchangeManager::new(ledger.clone(), holder.clone(), zkp.clone(), config)
        .with_responder(outbox.responder());
    Party {
        manager: Arc::new(manager),
        outbox,
        ledger,
        holder,
        zkp,
    }
}

pub fn prover(holder: MockHolder, config: ExchangeConfig) -> Party {
    party(
        MockLedger::default(),
        holder,
        MockZkpVerifier::accepting(),
        config,
    )
}

pub fn verifier(zkp: MockZkpVerifier, config: ExchangeConfig) -> Party {
    party(MockLedger::default(), MockHolder::default(), zkp, config)
}

pub fn into_proposal(message: AriesMessage) -> ProposePresentationV1 {
    match message {
        AriesMessage::PresentProof(PresentProofV1::ProposePresentation(msg)) => msg,
        other => panic!("expected a proposal, got {:?}", other.msg_type()),
    }
}

pub fn into_request(message: AriesMessage) -> RequestPresentationV1 {
    match message {
        AriesMessage::PresentProof(PresentProofV1::RequestPresentation(msg)) => msg,
        other => panic!("expected a request, got {:?}", other.msg_type()),
    }
}

pub fn into_presentation(message: AriesMessage) -> PresentationV1 {
    match message {
        AriesMessage::PresentProof(PresentProofV1::Presentation(msg)) => msg,
        other => panic!("expected a presentation, got {:?}", other.msg_type()),
    }
}

pub fn into_ack(message: AriesMessage) -> AckPresentationV1 {
    match message {
        AriesMessage::PresentProof(PresentProofV1::Ack(msg)) => msg,
        other => panic!("expected an ack, got {:?}", other.msg_type()),
    }
}

pub fn into_problem_report(message: AriesMessage) -> ProblemReport {
    match message {
        AriesMessage::ReportProblem(msg) => msg,
        other => panic!("expected a problem report, got {:?}", other.msg_type()),
    }
}

/// Rewrites the presentation carried by `msg`.
pub fn edit_presentation(msg: &mut PresentationV1, edit: impl FnOnce(&mut Presentation)) {
    let mut presentation: Presentation =
        get_attach_as_json(&msg.content.presentations_attach).unwrap();
    edit(&mut presentation);
    msg.content.presentations_attach =
        vec![make_attach_from_json(&presentation, AttachmentId::Presentation).unwrap()];
}
