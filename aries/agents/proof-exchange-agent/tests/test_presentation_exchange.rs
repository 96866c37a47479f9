pub mod utils;

use std::{path::PathBuf, sync::Arc};

use proof_exchange_agent::{
    proof_exchange::{
        anoncreds_types::data_types::{
            credential::{RequestedAttribute, RequestedCredentials, RequestedPredicate},
            pres_request::PresentationRequest,
            presentation::Presentation,
        },
        common::proofs::{
            prover::credential_selector::select_credentials_for_request,
            verifier::VerificationMessage,
        },
        handlers::util::get_attach_as_json,
        messages::msg_fields::protocols::present_proof::v1::propose::{
            PredicateOperator, PresentationAttr, PresentationPreview, Predicate,
        },
        protocols::proof_presentation::{
            state::{ExchangeState, Initiator, Role},
            verification_status::PresentationVerificationStatus,
        },
        utils::now_secs,
    },
    AgentError, AgentErrorKind, ExchangeConfig, ExchangeManager, ABANDONED_CODE,
    PRESENTATION_REJECTED_CODE, REQUEST_DECLINED_CODE,
};
use serde_json::json;
use test_utils::{
    constants::{CRED_DEF_ID, REV_REG_DELTA_TIMESTAMP, TAILS_HASH},
    mockdata::{
        credential_info, mock_holder::MockHolder, mock_ledger::MockLedger,
        mock_verifier::MockZkpVerifier, plain_credential, revocable_credential,
        verification_fixtures,
    },
};

use crate::utils::*;

fn name_and_age_preview() -> PresentationPreview {
    PresentationPreview::new(
        vec![PresentationAttr::builder()
            .name("name")
            .cred_def_id(CRED_DEF_ID)
            .value("Alex")
            .build()],
        vec![Predicate::builder()
            .name("age")
            .cred_def_id(CRED_DEF_ID)
            .predicate(PredicateOperator::GreaterOrEqual)
            .threshold(18)
            .build()],
    )
}

fn manual() -> ExchangeConfig {
    ExchangeConfig::default()
}

fn automatic() -> ExchangeConfig {
    ExchangeConfig::builder()
        .auto_present(true)
        .auto_verify(true)
        .tails_dir("/tmp/tails")
        .build()
}

/// Points every referent of `proof_req` at wallet credential `cred_id`.
fn answer_with(proof_req: &PresentationRequest, cred_id: &str) -> RequestedCredentials {
    RequestedCredentials {
        self_attested_attributes: Default::default(),
        requested_attributes: proof_req
            .requested_attributes
            .keys()
            .map(|referent| {
                (
                    referent.clone(),
                    RequestedAttribute {
                        cred_id: cred_id.to_owned(),
                        revealed: true,
                        timestamp: None,
                    },
                )
            })
            .collect(),
        requested_predicates: proof_req
            .requested_predicates
            .keys()
            .map(|referent| {
                (
                    referent.clone(),
                    RequestedPredicate {
                        cred_id: cred_id.to_owned(),
                        timestamp: None,
                    },
                )
            })
            .collect(),
    }
}

/// Runs a verifier initiated exchange up to the verifier holding the presentation.
async fn presented(
    prover: &Party,
    verifier: &Party,
    proof_req: &PresentationRequest,
) -> (String, String) {
    let verifier_record = verifier
        .manager
        .create_exchange_for_request(Some(CONNECTION_ID), proof_req, None)
        .await
        .unwrap();
    let request = into_request(verifier.outbox.pop());
    let prover_record = prover
        .manager
        .receive_request(Some(CONNECTION_ID), request)
        .await
        .unwrap();
    assert_eq!(prover_record.state(), ExchangeState::PresentationSent);
    (prover_record.id().to_owned(), verifier_record.id().to_owned())
}

#[tokio::test]
async fn test_proposal_bound_exchange_is_verified_and_acked() {
    let prover = prover(MockHolder::default().with_credential(plain_credential("cred1")), manual());
    let verifier = verifier(MockZkpVerifier::accepting(), manual());

    let prover_record = prover
        .manager
        .create_exchange_for_proposal(Some(CONNECTION_ID), name_and_age_preview(), None)
        .await
        .unwrap();
    assert_eq!(prover_record.state(), ExchangeState::ProposalSent);
    assert_eq!(prover_record.initiator(), Initiator::SelfInitiated);

    let proposal = into_proposal(prover.outbox.pop());
    let verifier_record = verifier
        .manager
        .receive_proposal(Some(CONNECTION_ID), proposal)
        .await
        .unwrap();
    assert_eq!(verifier_record.state(), ExchangeState::ProposalReceived);
    assert_eq!(verifier_record.initiator(), Initiator::External);
    assert_eq!(verifier_record.thread_id(), prover_record.thread_id());

    let verifier_record = verifier
        .manager
        .create_bound_request(verifier_record.id(), Some("Age check"), None)
        .await
        .unwrap();
    assert_eq!(verifier_record.state(), ExchangeState::RequestSent);

    let request = into_request(verifier.outbox.pop());
    let bound = prover
        .manager
        .receive_request(Some(CONNECTION_ID), request)
        .await
        .unwrap();
    assert_eq!(bound.id(), prover_record.id());
    assert_eq!(bound.state(), ExchangeState::RequestReceived);

    let proof_req = bound.get_presentation_request().unwrap();
    assert_eq!(proof_req.name, "Age check");
    let requested_credentials =
        select_credentials_for_request(
            prover.holder.as_ref(),
            &proof_req,
            bound.presentation_preview(),
        )
            .await
            .unwrap();
    prover
        .manager
        .create_presentation(bound.id(), &requested_credentials, Some("here".to_owned()))
        .await
        .unwrap();

    let presentation = into_presentation(prover.outbox.pop());
    let verifier_record = verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), presentation, None)
        .await
        .unwrap();
    assert_eq!(verifier_record.state(), ExchangeState::PresentationReceived);

    let verifier_record = verifier
        .manager
        .verify_presentation(verifier_record.id())
        .await
        .unwrap();
    assert_eq!(verifier_record.state(), ExchangeState::Verified);
    assert_eq!(verifier_record.verified, Some(true));
    assert_eq!(
        verifier_record.verification_status(),
        PresentationVerificationStatus::Valid
    );
    assert_eq!(verifier.zkp.call_count(), 1);

    let ack = into_ack(verifier.outbox.pop());
    let prover_record = prover
        .manager
        .receive_presentation_ack(Some(CONNECTION_ID), ack)
        .await
        .unwrap();
    assert_eq!(prover_record.state(), ExchangeState::PresentationAcked);
    assert_eq!(prover_record.verification_result, Some(true));
    assert!(prover_record.is_terminal());
}

#[tokio::test]
async fn test_automatic_exchange_of_revocable_credential() {
    let prover = prover(
        MockHolder::default().with_credential(revocable_credential("rev1", 3)),
        automatic(),
    );
    let verifier = verifier(MockZkpVerifier::accepting(), automatic());
    let proof_req = verification_fixtures::revocable_revealed_and_predicate().proof_req;

    let (_, verifier_id) = presented(&prover, &verifier, &proof_req).await;
    assert_eq!(prover.ledger.delta_fetch_count(), 1);
    assert_eq!(
        prover.holder.revocation_state_tails_paths(),
        vec![PathBuf::from("/tmp/tails").join(TAILS_HASH)]
    );

    let presentation = into_presentation(prover.outbox.pop());
    let sent: Presentation =
        get_attach_as_json(&presentation.content.presentations_attach).unwrap();
    assert!(!sent.identifiers.is_empty());
    assert!(sent
        .identifiers
        .iter()
        .all(|identifier| identifier.timestamp == Some(REV_REG_DELTA_TIMESTAMP)));

    let verifier_record = verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), presentation, None)
        .await
        .unwrap();
    assert_eq!(verifier_record.id(), verifier_id);
    assert_eq!(verifier_record.state(), ExchangeState::Verified);
    assert_eq!(verifier_record.verified, Some(true));

    let prover_record = prover
        .manager
        .receive_presentation_ack(Some(CONNECTION_ID), into_ack(verifier.outbox.pop()))
        .await
        .unwrap();
    assert_eq!(prover_record.verification_result, Some(true));
}

#[tokio::test]
async fn test_presentation_mismatching_proposal_is_refused() {
    let bob = credential_info("bob", CRED_DEF_ID, &[("name", "Bob"), ("age", "40")]);
    let prover = prover(MockHolder::default().with_credential(bob), manual());
    let verifier = verifier(MockZkpVerifier::accepting(), manual());

    prover
        .manager
        .create_exchange_for_proposal(Some(CONNECTION_ID), name_and_age_preview(), None)
        .await
        .unwrap();
    let verifier_record = verifier
        .manager
        .receive_proposal(Some(CONNECTION_ID), into_proposal(prover.outbox.pop()))
        .await
        .unwrap();
    verifier
        .manager
        .create_bound_request(verifier_record.id(), None, None)
        .await
        .unwrap();
    let prover_record = prover
        .manager
        .receive_request(Some(CONNECTION_ID), into_request(verifier.outbox.pop()))
        .await
        .unwrap();

    let proof_req = prover_record.get_presentation_request().unwrap();
    prover
        .manager
        .create_presentation(prover_record.id(), &answer_with(&proof_req, "bob"), None)
        .await
        .unwrap();

    let err = verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), into_presentation(prover.outbox.pop()), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::TamperDetected);

    let verifier_record = verifier.manager.get_record(verifier_record.id()).await.unwrap();
    assert_eq!(verifier_record.state(), ExchangeState::RequestSent);
    assert!(verifier_record.presentation.is_none());
    assert_eq!(verifier.zkp.call_count(), 0);
}

#[tokio::test]
async fn test_tampered_presentation_is_rejected_and_reported() {
    let prover = prover(
        MockHolder::default().with_credential(plain_credential("cred1")),
        automatic(),
    );
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let (prover_id, verifier_id) = presented(&prover, &verifier, &proof_req).await;
    let mut presentation = into_presentation(prover.outbox.pop());
    edit_presentation(&mut presentation, |presentation| {
        if let Some(attr) = presentation.requested_proof.revealed_attrs.get_mut("attr_name") {
            attr.raw = "Mallory".to_owned();
        }
    });
    verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), presentation, None)
        .await
        .unwrap();

    let err = verifier.manager.verify_presentation(&verifier_id).await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::TamperDetected);
    assert_eq!(verifier.zkp.call_count(), 0);

    let verifier_record = verifier.manager.get_record(&verifier_id).await.unwrap();
    assert_eq!(verifier_record.state(), ExchangeState::Abandoned);
    assert_eq!(verifier_record.verified, Some(false));
    assert!(matches!(
        verifier_record.verified_msgs.last(),
        Some(VerificationMessage::ValueError(_))
    ));

    let report = into_problem_report(verifier.outbox.pop());
    assert_eq!(report.content.description.code, PRESENTATION_REJECTED_CODE);
    let prover_record = prover
        .manager
        .receive_problem_report(Some(CONNECTION_ID), report)
        .await
        .unwrap();
    assert_eq!(prover_record.id(), prover_id);
    assert_eq!(prover_record.state(), ExchangeState::Abandoned);
    assert!(prover_record.error_msg.is_some());
}

#[tokio::test]
async fn test_future_timestamp_is_a_temporal_violation() {
    let prover = prover(
        MockHolder::default().with_credential(revocable_credential("rev1", 3)),
        automatic(),
    );
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revocable_revealed_and_predicate().proof_req;

    let (_, verifier_id) = presented(&prover, &verifier, &proof_req).await;
    let mut presentation = into_presentation(prover.outbox.pop());
    let future = now_secs() + 3600;
    edit_presentation(&mut presentation, |presentation| {
        for identifier in presentation.identifiers.iter_mut() {
            identifier.timestamp = Some(future);
        }
    });
    verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), presentation, None)
        .await
        .unwrap();

    let err = verifier.manager.verify_presentation(&verifier_id).await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::TemporalViolation);
    let record = verifier.manager.get_record(&verifier_id).await.unwrap();
    assert_eq!(record.state(), ExchangeState::Abandoned);
    assert_eq!(verifier.zkp.call_count(), 0);
}

#[tokio::test]
async fn test_failing_cryptographic_check_is_a_negative_verdict() {
    let prover = prover(
        MockHolder::default().with_credential(plain_credential("cred1")),
        automatic(),
    );
    let verifier = verifier(MockZkpVerifier::failing("bad signature"), automatic());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let (_, verifier_id) = presented(&prover, &verifier, &proof_req).await;
    let record = verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), into_presentation(prover.outbox.pop()), None)
        .await
        .unwrap();
    assert_eq!(record.id(), verifier_id);
    assert_eq!(record.state(), ExchangeState::Verified);
    assert_eq!(record.verified, Some(false));
    assert_eq!(record.verification_status(), PresentationVerificationStatus::Invalid);
    assert!(record
        .verified_msgs
        .iter()
        .any(|msg| matches!(msg, VerificationMessage::VerifyError(_))));

    let prover_record = prover
        .manager
        .receive_presentation_ack(Some(CONNECTION_ID), into_ack(verifier.outbox.pop()))
        .await
        .unwrap();
    assert_eq!(prover_record.verification_result, Some(false));
}

#[tokio::test]
async fn test_unrestricted_attribute_is_self_attested_and_verified() {
    let wallet = MockHolder::default().with_credential(credential_info(
        "score1",
        CRED_DEF_ID,
        &[("score", "42")],
    ));
    let prover = prover(wallet, automatic());
    let verifier = verifier(MockZkpVerifier::accepting(), automatic());
    let proof_req: PresentationRequest = serde_json::from_value(json!({
        "nonce": "12345",
        "name": "score",
        "version": "1.0",
        "requested_attributes": {"score_uuid": {"name": "score"}},
        "requested_predicates": {}
    }))
    .unwrap();

    presented(&prover, &verifier, &proof_req).await;
    let presentation = into_presentation(prover.outbox.pop());
    let sent: Presentation =
        get_attach_as_json(&presentation.content.presentations_attach).unwrap();
    assert_eq!(
        sent.requested_proof.self_attested_attrs.get("score_uuid").map(String::as_str),
        Some("42")
    );
    assert!(sent.requested_proof.revealed_attrs.is_empty());
    assert!(sent.identifiers.is_empty());

    let record = verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), presentation, None)
        .await
        .unwrap();
    assert_eq!(record.verified, Some(true));
    assert!(record.verified_msgs.is_empty());
}

#[tokio::test]
async fn test_auto_present_without_matching_credential_waits_for_the_holder() {
    let prover = prover(MockHolder::default(), automatic());
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    verifier
        .manager
        .create_exchange_for_request(Some(CONNECTION_ID), &proof_req, None)
        .await
        .unwrap();
    let record = prover
        .manager
        .receive_request(Some(CONNECTION_ID), into_request(verifier.outbox.pop()))
        .await
        .unwrap();
    assert_eq!(record.state(), ExchangeState::RequestReceived);
    assert_eq!(prover.outbox.len(), 0);
}

#[tokio::test]
async fn test_declined_request_abandons_both_sides() {
    let prover = prover(MockHolder::default(), manual());
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let verifier_record = verifier
        .manager
        .create_exchange_for_request(Some(CONNECTION_ID), &proof_req, None)
        .await
        .unwrap();
    let prover_record = prover
        .manager
        .receive_request(Some(CONNECTION_ID), into_request(verifier.outbox.pop()))
        .await
        .unwrap();

    let declined = prover
        .manager
        .decline_request(prover_record.id(), Some("not today"))
        .await
        .unwrap();
    assert_eq!(declined.state(), ExchangeState::Abandoned);

    let report = into_problem_report(prover.outbox.pop());
    assert_eq!(report.content.description.code, REQUEST_DECLINED_CODE);
    let verifier_record_after = verifier
        .manager
        .receive_problem_report(Some(CONNECTION_ID), report)
        .await
        .unwrap();
    assert_eq!(verifier_record_after.id(), verifier_record.id());
    assert_eq!(verifier_record_after.state(), ExchangeState::Abandoned);
    assert_eq!(verifier_record_after.error_msg.as_deref(), Some("not today"));

    let err = prover
        .manager
        .decline_request(prover_record.id(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::InvalidState);
}

#[tokio::test]
async fn test_send_problem_report_abandons_with_reason() {
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;
    let record = verifier
        .manager
        .create_exchange_for_request(Some(CONNECTION_ID), &proof_req, None)
        .await
        .unwrap();
    verifier.outbox.pop();

    let record = verifier
        .manager
        .send_problem_report(record.id(), "changed my mind")
        .await
        .unwrap();
    assert_eq!(record.state(), ExchangeState::Abandoned);
    assert_eq!(record.error_msg.as_deref(), Some("changed my mind"));

    let report = into_problem_report(verifier.outbox.pop());
    assert_eq!(report.content.description.code, ABANDONED_CODE);
    assert_eq!(
        report.decorators.thread.map(|thread| thread.thid),
        Some(record.thread_id().to_owned())
    );

    let err = verifier
        .manager
        .abandon_exchange(record.id(), "again")
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::InvalidState);
}

#[tokio::test]
async fn test_auto_remove_drops_finished_exchanges() {
    let config = ExchangeConfig::builder()
        .auto_present(true)
        .auto_verify(true)
        .auto_remove(true)
        .build();
    let prover = prover(
        MockHolder::default().with_credential(plain_credential("cred1")),
        config.clone(),
    );
    let verifier = verifier(MockZkpVerifier::accepting(), config);
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let (prover_id, verifier_id) = presented(&prover, &verifier, &proof_req).await;
    let record = verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), into_presentation(prover.outbox.pop()), None)
        .await
        .unwrap();
    assert_eq!(record.state(), ExchangeState::Verified);
    let err = verifier.manager.get_record(&verifier_id).await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::NotFound);

    prover
        .manager
        .receive_presentation_ack(Some(CONNECTION_ID), into_ack(verifier.outbox.pop()))
        .await
        .unwrap();
    assert!(prover.manager.get_record(&prover_id).await.is_err());
    assert!(prover.manager.list_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ack_on_unknown_thread_is_not_found() {
    let prover = prover(
        MockHolder::default().with_credential(plain_credential("cred1")),
        automatic(),
    );
    let verifier = verifier(MockZkpVerifier::accepting(), automatic());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let (prover_id, _) = presented(&prover, &verifier, &proof_req).await;
    verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), into_presentation(prover.outbox.pop()), None)
        .await
        .unwrap();
    let ack = into_ack(verifier.outbox.pop());

    let err = prover
        .manager
        .receive_presentation_ack(Some("another-connection"), ack.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::NotFound);

    prover.manager.delete_record(&prover_id).unwrap();
    let err = prover
        .manager
        .receive_presentation_ack(Some(CONNECTION_ID), ack)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::NotFound);
}

#[tokio::test]
async fn test_invalid_transition_leaves_record_untouched() {
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;
    let record = verifier
        .manager
        .create_exchange_for_request(Some(CONNECTION_ID), &proof_req, None)
        .await
        .unwrap();

    let err = verifier.manager.verify_presentation(record.id()).await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::InvalidState);
    let err = verifier
        .manager
        .create_presentation(record.id(), &RequestedCredentials::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::InvalidState);

    let stored = verifier.manager.get_record(record.id()).await.unwrap();
    assert_eq!(stored.state(), ExchangeState::RequestSent);
    assert_eq!(stored.updated_at(), record.updated_at());
    assert_eq!(
        verifier
            .manager
            .find_by_thread(record.thread_id(), Role::Verifier, Some(CONNECTION_ID))
            .await
            .unwrap()
            .map(|found| found.id().to_owned()),
        Some(record.id().to_owned())
    );
}

#[tokio::test]
async fn test_connectionless_message_does_not_reach_bound_exchange() {
    let prover = prover(
        MockHolder::default().with_credential(plain_credential("cred1")),
        automatic(),
    );
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let (_, verifier_id) = presented(&prover, &verifier, &proof_req).await;
    let presentation = into_presentation(prover.outbox.pop());
    let thread_id = presentation.decorators.thread.thid.clone();

    let err = verifier
        .manager
        .receive_presentation(None, presentation.clone(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::NotFound);
    assert!(verifier
        .manager
        .find_by_thread(&thread_id, Role::Verifier, None)
        .await
        .unwrap()
        .is_none());
    let stored = verifier.manager.get_record(&verifier_id).await.unwrap();
    assert_eq!(stored.state(), ExchangeState::RequestSent);

    let record = verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), presentation, None)
        .await
        .unwrap();
    assert_eq!(record.id(), verifier_id);
    assert_eq!(record.state(), ExchangeState::PresentationReceived);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_requests_on_one_thread_open_one_exchange() {
    let prover = prover(MockHolder::default().with_credential(plain_credential("cred1")), manual());
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let verifier_record = verifier
        .manager
        .create_exchange_for_request(Some(CONNECTION_ID), &proof_req, None)
        .await
        .unwrap();
    let request = into_request(verifier.outbox.pop());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = prover.manager.clone();
            let request = request.clone();
            tokio::spawn(async move { manager.receive_request(Some(CONNECTION_ID), request).await })
        })
        .collect();
    let mut opened = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(record) => {
                assert_eq!(record.state(), ExchangeState::RequestReceived);
                opened += 1;
            }
            Err(err) => assert_eq!(err.kind, AgentErrorKind::InvalidState),
        }
    }
    assert_eq!(opened, 1);
    assert_eq!(prover.manager.list_records().await.unwrap().len(), 1);
    assert!(prover
        .manager
        .find_by_thread(verifier_record.thread_id(), Role::Prover, Some(CONNECTION_ID))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_revoked_credential_abandons_presentation() {
    let prover = party(
        MockLedger::default().with_revoked(3),
        MockHolder::default().with_credential(revocable_credential("rev1", 3)),
        MockZkpVerifier::accepting(),
        ExchangeConfig::builder().tails_dir("/tmp/tails").build(),
    );
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revocable_revealed_and_predicate().proof_req;

    verifier
        .manager
        .create_exchange_for_request(Some(CONNECTION_ID), &proof_req, None)
        .await
        .unwrap();
    let record = prover
        .manager
        .receive_request(Some(CONNECTION_ID), into_request(verifier.outbox.pop()))
        .await
        .unwrap();

    let err = prover
        .manager
        .create_presentation(record.id(), &answer_with(&proof_req, "rev1"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::BackendFailure);

    let record = prover.manager.get_record(record.id()).await.unwrap();
    assert_eq!(record.state(), ExchangeState::Abandoned);
    assert!(record.error_msg.is_some());
    assert_eq!(prover.outbox.len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verification_runs_once() {
    let prover = prover(
        MockHolder::default().with_credential(plain_credential("cred1")),
        automatic(),
    );
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let (_, verifier_id) = presented(&prover, &verifier, &proof_req).await;
    verifier
        .manager
        .receive_presentation(Some(CONNECTION_ID), into_presentation(prover.outbox.pop()), None)
        .await
        .unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let manager = verifier.manager.clone();
            let id = verifier_id.clone();
            tokio::spawn(async move { manager.verify_presentation(&id).await })
        })
        .collect();
    let mut verified = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(record) => {
                assert_eq!(record.state(), ExchangeState::Verified);
                verified += 1;
            }
            Err(err) => assert_eq!(err.kind, AgentErrorKind::InvalidState),
        }
    }
    assert_eq!(verified, 1);
    assert_eq!(verifier.zkp.call_count(), 1);
    assert_eq!(verifier.outbox.len(), 1);
}

#[tokio::test]
async fn test_delivery_failure_keeps_committed_record() {
    test_utils::logger::init_logger();
    let mut responder = MockResponder::new();
    responder
        .expect_send_message()
        .times(1)
        .returning(|_, _| Err(AgentError::from_kind(AgentErrorKind::DeliveryFailure)));
    let manager = ExchangeManager::new(
        Arc::new(MockLedger::default()),
        Arc::new(MockHolder::default()),
        Arc::new(MockZkpVerifier::accepting()),
        manual(),
    )
    .with_responder(Arc::new(responder));
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let err = manager
        .create_exchange_for_request(Some(CONNECTION_ID), &proof_req, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::DeliveryFailure);

    let records = manager.list_records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].state(), ExchangeState::RequestSent);
    assert_eq!(records[0].role(), Role::Verifier);
}

#[tokio::test]
async fn test_manager_without_responder_still_records() {
    test_utils::logger::init_logger();
    let manager = ExchangeManager::new(
        Arc::new(MockLedger::default()),
        Arc::new(MockHolder::default()),
        Arc::new(MockZkpVerifier::accepting()),
        manual(),
    );
    assert_eq!(manager.config(), &ExchangeConfig::default());

    let record = manager
        .create_exchange_for_proposal(None, name_and_age_preview(), None)
        .await
        .unwrap();
    assert_eq!(record.state(), ExchangeState::ProposalSent);
    assert_eq!(record.connection_id(), None);
    assert!(manager
        .find_by_thread(record.thread_id(), Role::Prover, Some("any"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_counter_proposal_continues_the_thread() {
    let prover = prover(MockHolder::default().with_credential(plain_credential("cred1")), manual());
    let verifier = verifier(MockZkpVerifier::accepting(), manual());
    let proof_req = verification_fixtures::revealed_and_predicate().proof_req;

    let verifier_record = verifier
        .manager
        .create_exchange_for_request(Some(CONNECTION_ID), &proof_req, None)
        .await
        .unwrap();
    let prover_record = prover
        .manager
        .receive_request(Some(CONNECTION_ID), into_request(verifier.outbox.pop()))
        .await
        .unwrap();

    let countered = prover
        .manager
        .create_counter_proposal(prover_record.id(), name_and_age_preview(), None)
        .await
        .unwrap();
    assert_eq!(countered.state(), ExchangeState::ProposalSent);

    let proposal = into_proposal(prover.outbox.pop());
    assert_eq!(
        proposal.decorators.thread.as_ref().map(|thread| thread.thid.as_str()),
        Some(verifier_record.thread_id())
    );
    let received = verifier
        .manager
        .receive_proposal(Some(CONNECTION_ID), proposal)
        .await
        .unwrap();
    assert_eq!(received.id(), verifier_record.id());
    assert_eq!(received.state(), ExchangeState::ProposalReceived);

    verifier
        .manager
        .create_bound_request(received.id(), None, None)
        .await
        .unwrap();
    let rebound = prover
        .manager
        .receive_request(Some(CONNECTION_ID), into_request(verifier.outbox.pop()))
        .await
        .unwrap();
    assert_eq!(rebound.id(), prover_record.id());
    assert_eq!(rebound.state(), ExchangeState::RequestReceived);
    assert_eq!(prover.manager.list_records().await.unwrap().len(), 1);
}
