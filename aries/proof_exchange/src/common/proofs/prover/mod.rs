pub mod credential_selector;
pub mod prover_internal;

use std::path::Path;

use anoncreds_types::data_types::{
    credential::RequestedCredentials, pres_request::PresentationRequest,
    presentation::Presentation,
};
use aries_vcx_anoncreds::anoncreds::base_anoncreds::BaseHolder;
use aries_vcx_ledger::ledger::base_ledger::AnoncredsLedgerRead;

use self::prover_internal::{
    build_cred_defs_json_prover, build_requested_credentials_json, build_rev_states_json,
    build_schemas_json_prover, credential_def_identifiers,
};
use crate::{errors::error::prelude::*, utils::now_secs};

/// Builds the presentation answering `proof_req` with `requested_credentials`. Revocation
/// witnesses are computed first so the holder receives timestamped credential references.
pub async fn generate_indy_proof(
    ledger: &impl AnoncredsLedgerRead,
    holder: &impl BaseHolder,
    proof_req: &PresentationRequest,
    requested_credentials: &RequestedCredentials,
    tails_dir: Option<&Path>,
) -> VcxResult<Presentation> {
    trace!(
        "generate_indy_proof >>> proof_req: {:?}, requested_credentials: {:?}",
        proof_req,
        requested_credentials
    );

    let mut credentials_identifiers =
        credential_def_identifiers(holder, requested_credentials, proof_req).await?;

    let revoc_states_json = build_rev_states_json(
        ledger,
        holder,
        tails_dir,
        now_secs(),
        &mut credentials_identifiers,
    )
    .await?;
    let requested_credentials =
        build_requested_credentials_json(&credentials_identifiers, requested_credentials);

    let schemas_json = build_schemas_json_prover(ledger, &credentials_identifiers).await?;
    let credential_defs_json = build_cred_defs_json_prover(ledger, &credentials_identifiers).await?;

    let presentation = holder
        .create_presentation(
            proof_req,
            &requested_credentials,
            &schemas_json,
            &credential_defs_json,
            (!revoc_states_json.is_empty()).then_some(&revoc_states_json),
        )
        .await?;
    Ok(presentation)
}
