use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use anoncreds_types::data_types::{
    credential::{CredentialInfo, RequestedCredentials, RevocationStatesMap},
    identifiers::{
        cred_def_id::CredentialDefinitionId, rev_reg_def_id::RevocationRegistryDefinitionId,
        schema_id::SchemaId,
    },
    ledger::{rev_reg_def::RevocationRegistryDefinition, rev_reg_delta::RevocationRegistryDelta},
    pres_request::{NonRevokedInterval, PresentationRequest},
};
use aries_vcx_anoncreds::anoncreds::base_anoncreds::{
    BaseHolder, CredentialDefinitionsMap, SchemasMap,
};
use aries_vcx_ledger::ledger::base_ledger::AnoncredsLedgerRead;

use crate::errors::error::prelude::*;

/// One credential backed referent of a proof request, with the ledger objects behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredInfoProver {
    pub referent: String,
    pub credential_referent: String,
    pub schema_id: SchemaId,
    pub cred_def_id: CredentialDefinitionId,
    pub rev_reg_id: Option<RevocationRegistryDefinitionId>,
    pub cred_rev_id: Option<u32>,
    pub revocation_interval: Option<NonRevokedInterval>,
    pub timestamp: Option<u64>,
}

/// Ledger query shared by every referent of the same registry and interval.
type DeltaKey = (RevocationRegistryDefinitionId, u64, u64);

pub async fn build_schemas_json_prover(
    ledger: &impl AnoncredsLedgerRead,
    credentials_identifiers: &[CredInfoProver],
) -> VcxResult<SchemasMap> {
    trace!(
        "build_schemas_json_prover >>> credentials_identifiers: {:?}",
        credentials_identifiers
    );
    let mut rtn: SchemasMap = HashMap::new();

    for cred_info in credentials_identifiers {
        if !rtn.contains_key(&cred_info.schema_id) {
            let schema_json = ledger
                .get_schema(&cred_info.schema_id)
                .await
                .map_err(|err| {
                    AriesVcxError::from(err)
                        .extend(format!("Cannot get schema id {}", cred_info.schema_id))
                })?;

            rtn.insert(cred_info.schema_id.to_owned(), schema_json);
        }
    }
    Ok(rtn)
}

pub async fn build_cred_defs_json_prover(
    ledger: &impl AnoncredsLedgerRead,
    credentials_identifiers: &[CredInfoProver],
) -> VcxResult<CredentialDefinitionsMap> {
    trace!(
        "build_cred_defs_json_prover >>> credentials_identifiers: {:?}",
        credentials_identifiers
    );
    let mut rtn: CredentialDefinitionsMap = HashMap::new();

    for cred_info in credentials_identifiers {
        if !rtn.contains_key(&cred_info.cred_def_id) {
            let credential_def = ledger
                .get_cred_def(&cred_info.cred_def_id)
                .await
                .map_err(|err| {
                    AriesVcxError::from(err).extend(format!(
                        "Cannot get credential definition {}",
                        cred_info.cred_def_id
                    ))
                })?;

            rtn.insert(cred_info.cred_def_id.to_owned(), credential_def);
        }
    }
    Ok(rtn)
}

/// Resolves every credential reference of `credentials` against the holder's wallet.
/// Referents come out in lexical order.
pub async fn credential_def_identifiers(
    holder: &impl BaseHolder,
    credentials: &RequestedCredentials,
    proof_req: &PresentationRequest,
) -> VcxResult<Vec<CredInfoProver>> {
    trace!(
        "credential_def_identifiers >>> credentials: {:?}, proof_req: {:?}",
        credentials,
        proof_req
    );
    let referents: BTreeMap<&str, &str> = credentials
        .requested_attributes
        .iter()
        .map(|(referent, attr)| (referent.as_str(), attr.cred_id.as_str()))
        .chain(
            credentials
                .requested_predicates
                .iter()
                .map(|(referent, pred)| (referent.as_str(), pred.cred_id.as_str())),
        )
        .collect();

    let mut wallet_credentials: HashMap<&str, CredentialInfo> = HashMap::new();
    let mut rtn = Vec::new();

    for (referent, cred_id) in referents {
        if !proof_req.requested_attributes.contains_key(referent)
            && !proof_req.requested_predicates.contains_key(referent)
        {
            return Err(AriesVcxError::from_msg(
                AriesVcxErrorKind::MalformedInput,
                format!("Referent {} is not part of the proof request", referent),
            ));
        }

        if !wallet_credentials.contains_key(cred_id) {
            let cred_info = holder.get_credential(cred_id).await?;
            wallet_credentials.insert(cred_id, cred_info);
        }
        let cred_info = &wallet_credentials[cred_id];

        rtn.push(CredInfoProver {
            referent: referent.to_owned(),
            credential_referent: cred_info.referent.clone(),
            schema_id: cred_info.schema_id.clone(),
            cred_def_id: cred_info.cred_def_id.clone(),
            rev_reg_id: cred_info.rev_reg_id.clone(),
            cred_rev_id: cred_info.cred_rev_id,
            revocation_interval: proof_req.resolved_interval(referent).cloned(),
            timestamp: None,
        });
    }

    Ok(rtn)
}

fn delta_key(cred_info: &CredInfoProver, now: u64) -> Option<DeltaKey> {
    let rev_reg_id = cred_info.rev_reg_id.as_ref()?;
    let (from, to) = cred_info.revocation_interval.as_ref()?.bounds(now);
    Some((rev_reg_id.clone(), from, to))
}

/// Computes the accumulator witnesses the presentation needs and stamps each revocable
/// referent with the ledger time of its delta.
///
/// Referents of one registry asking for the same interval share a single delta fetch.
/// Referents without an interval get neither a timestamp nor a witness.
pub async fn build_rev_states_json(
    ledger_read: &impl AnoncredsLedgerRead,
    holder: &impl BaseHolder,
    tails_dir: Option<&Path>,
    now: u64,
    credentials_identifiers: &mut [CredInfoProver],
) -> VcxResult<RevocationStatesMap> {
    trace!(
        "build_rev_states_json >> credentials_identifiers: {:?}",
        credentials_identifiers
    );
    let mut deltas: HashMap<DeltaKey, (RevocationRegistryDelta, u64)> = HashMap::new();

    for cred_info in credentials_identifiers.iter_mut() {
        let Some(key) = delta_key(cred_info, now) else {
            continue;
        };
        if !deltas.contains_key(&key) {
            let (rev_reg_id, from, to) = &key;
            let delta = ledger_read
                .get_rev_reg_delta_json(rev_reg_id, Some(*from), Some(*to))
                .await?;
            deltas.insert(key.clone(), delta);
        }
        cred_info.timestamp = Some(deltas[&key].1);
    }

    let mut rtn: RevocationStatesMap = HashMap::new();
    let mut rev_reg_defs: HashMap<RevocationRegistryDefinitionId, RevocationRegistryDefinition> =
        HashMap::new();
    let mut witnessed: HashMap<(RevocationRegistryDefinitionId, u64), u32> = HashMap::new();

    for cred_info in credentials_identifiers.iter() {
        let (Some(key), Some(timestamp)) = (delta_key(cred_info, now), cred_info.timestamp) else {
            continue;
        };
        let rev_reg_id = &key.0;
        let cred_rev_id = cred_info.cred_rev_id.ok_or_else(|| {
            AriesVcxError::from_msg(
                AriesVcxErrorKind::InvalidState,
                format!(
                    "Credential {} belongs to registry {} but has no revocation index",
                    cred_info.credential_referent, rev_reg_id
                ),
            )
        })?;

        match witnessed.get(&(rev_reg_id.clone(), timestamp)) {
            Some(existing) if *existing == cred_rev_id => continue,
            Some(existing) => {
                return Err(AriesVcxError::from_msg(
                    AriesVcxErrorKind::ActionNotSupported,
                    format!(
                        "Credentials {} and {} of registry {} both need a witness at {}",
                        existing, cred_rev_id, rev_reg_id, timestamp
                    ),
                ))
            }
            None => {}
        }

        let tails_dir = tails_dir.ok_or_else(|| {
            AriesVcxError::from_msg(
                AriesVcxErrorKind::InvalidState,
                format!(
                    "No tails directory configured for revocable credential {}",
                    cred_info.credential_referent
                ),
            )
        })?;

        if !rev_reg_defs.contains_key(rev_reg_id) {
            let (rev_reg_def, _meta) = ledger_read.get_rev_reg_def_json(rev_reg_id).await?;
            rev_reg_defs.insert(rev_reg_id.clone(), rev_reg_def);
        }
        let rev_reg_def = &rev_reg_defs[rev_reg_id];
        let (delta, _) = &deltas[&key];

        let rev_state = holder
            .create_revocation_state(
                cred_rev_id,
                rev_reg_def,
                delta,
                timestamp,
                &tails_dir.join(&rev_reg_def.value.tails_hash),
            )
            .await?;

        rtn.entry(rev_reg_id.to_string())
            .or_default()
            .insert(timestamp, rev_state);
        witnessed.insert((rev_reg_id.clone(), timestamp), cred_rev_id);
    }

    Ok(rtn)
}

/// Copies the timestamps found by [build_rev_states_json] onto the holder's answer.
pub fn build_requested_credentials_json(
    credentials_identifiers: &[CredInfoProver],
    requested_credentials: &RequestedCredentials,
) -> RequestedCredentials {
    trace!(
        "build_requested_credentials_json >> credentials_identifiers: {:?}",
        credentials_identifiers
    );
    let mut rtn = requested_credentials.clone();
    for cred_info in credentials_identifiers {
        if let Some(timestamp) = cred_info.timestamp {
            rtn.set_timestamp(&cred_info.referent, timestamp);
        }
    }
    rtn
}
