//! Checks run on a presentation before the cryptographic verification: interval
//! reconciliation, timestamp validation and structural consistency with the request.

use std::collections::BTreeMap;

use anoncreds_types::{
    data_types::{
        ledger::cred_def::CredentialDefinition,
        pres_request::{AttributeInfo, NonRevokedInterval, PredicateInfo, PresentationRequest},
        presentation::{Identifier, Presentation},
    },
    utils::encoding::{canon, encode},
};
use aries_vcx_anoncreds::anoncreds::base_anoncreds::CredentialDefinitionsMap;

use super::{VerificationInputs, VerificationMessage};
use crate::errors::error::prelude::*;

fn malformed(msg: String) -> AriesVcxError {
    AriesVcxError::from_msg(AriesVcxErrorKind::MalformedInput, msg)
}

fn temporal(msg: String) -> AriesVcxError {
    AriesVcxError::from_msg(AriesVcxErrorKind::TemporalViolation, msg)
}

fn tampered(msg: String) -> AriesVcxError {
    AriesVcxError::from_msg(AriesVcxErrorKind::TamperDetected, msg)
}

fn identifier_at(presentation: &Presentation, sub_proof_index: u32) -> VcxResult<&Identifier> {
    presentation.identifier(sub_proof_index).ok_or_else(|| {
        malformed(format!(
            "Presentation has no identifier for sub-proof #{}",
            sub_proof_index
        ))
    })
}

fn cred_def_at<'a>(
    presentation: &Presentation,
    cred_defs: &'a CredentialDefinitionsMap,
    sub_proof_index: u32,
) -> VcxResult<&'a CredentialDefinition> {
    let identifier = identifier_at(presentation, sub_proof_index)?;
    cred_defs.get(&identifier.cred_def_id).ok_or_else(|| {
        malformed(format!(
            "Missing credential definition {} for sub-proof #{}",
            identifier.cred_def_id, sub_proof_index
        ))
    })
}

/// Phase 1. Drops intervals that cannot apply: the interval of a referent backed by an
/// irrevocable credential, and the request level interval when no presented credential is
/// revocable.
pub fn reconcile_intervals(
    proof_req: &mut PresentationRequest,
    presentation: &Presentation,
    cred_defs: &CredentialDefinitionsMap,
) -> VcxResult<Vec<VerificationMessage>> {
    let mut msgs = Vec::new();

    let referents: BTreeMap<&str, u32> = presentation
        .requested_proof
        .credential_backed_referents()
        .into_iter()
        .collect();
    for (referent, sub_proof_index) in referents {
        if cred_def_at(presentation, cred_defs, sub_proof_index)?.supports_revocation() {
            continue;
        }
        let interval = match proof_req.requested_attributes.get_mut(referent) {
            Some(attr) => &mut attr.non_revoked,
            None => match proof_req.requested_predicates.get_mut(referent) {
                Some(pred) => &mut pred.non_revoked,
                None => continue,
            },
        };
        if interval.take().is_some() {
            msgs.push(VerificationMessage::RemovedReferentInterval(
                referent.to_owned(),
            ));
        }
    }

    if proof_req.non_revoked.is_some() {
        let mut any_revocable = false;
        for identifier in &presentation.identifiers {
            let cred_def = cred_defs.get(&identifier.cred_def_id).ok_or_else(|| {
                malformed(format!(
                    "Missing credential definition {}",
                    identifier.cred_def_id
                ))
            })?;
            any_revocable |= cred_def.supports_revocation();
        }
        if !any_revocable {
            proof_req.non_revoked = None;
            msgs.push(VerificationMessage::RemovedGlobalInterval);
        }
    }

    Ok(msgs)
}

/// Phase 2. Validates the timestamps of the presentation identifiers against the ledger and
/// against the intervals of the request.
pub fn check_timestamps(
    proof_req: &PresentationRequest,
    presentation: &Presentation,
    inputs: &VerificationInputs,
) -> VcxResult<Vec<VerificationMessage>> {
    let mut msgs = Vec::new();

    for (index, identifier) in presentation.identifiers.iter().enumerate() {
        let Some(timestamp) = identifier.timestamp else {
            continue;
        };
        let cred_def = inputs.cred_defs.get(&identifier.cred_def_id).ok_or_else(|| {
            malformed(format!(
                "Missing credential definition {}",
                identifier.cred_def_id
            ))
        })?;
        if !cred_def.supports_revocation() {
            return Err(temporal(format!(
                "Timestamp in presentation identifier #{} for irrevocable cred def id {}",
                index, identifier.cred_def_id
            )));
        }
        if timestamp > inputs.now.saturating_add(inputs.clock_skew_secs) {
            return Err(temporal(format!("Timestamp {} is in the future", timestamp)));
        }

        let rev_reg_id = identifier.rev_reg_id.as_ref().ok_or_else(|| {
            malformed(format!(
                "Timestamped identifier #{} names no revocation registry",
                index
            ))
        })?;
        if !inputs.rev_reg_defs.contains_key(rev_reg_id) {
            return Err(malformed(format!(
                "Missing registry definition for '{}'",
                rev_reg_id
            )));
        }
        let txn_time = inputs
            .rev_reg_defs_metadata
            .get(rev_reg_id)
            .and_then(|meta| meta.txn_time)
            .ok_or_else(|| {
                malformed(format!(
                    "Missing txnTime for registry definition '{}'",
                    rev_reg_id
                ))
            })?;
        if timestamp < txn_time {
            return Err(temporal(format!(
                "Timestamp {} predates rev reg {} creation",
                timestamp, rev_reg_id
            )));
        }
    }

    let attributes: BTreeMap<_, _> = proof_req.requested_attributes.iter().collect();
    for (referent, attr_info) in attributes {
        let interval = proof_req.resolved_interval(referent);
        if attr_info.names.is_some() {
            msgs.extend(check_attr_group_timestamp(
                referent,
                interval,
                presentation,
                inputs,
            )?);
        } else {
            msgs.extend(check_attr_timestamp(
                referent,
                attr_info,
                interval,
                presentation,
                inputs,
            )?);
        }
    }

    let predicates: BTreeMap<_, _> = proof_req.requested_predicates.iter().collect();
    for (referent, pred_info) in predicates {
        let interval = proof_req.resolved_interval(referent);
        msgs.extend(check_predicate_timestamp(
            referent,
            pred_info,
            interval,
            presentation,
            inputs,
        )?);
    }

    Ok(msgs)
}

/// Timestamp of the sub proof behind `referent` when its credential is revocable, `None`
/// when it is not (and so carries no timestamp rule).
fn revocable_timestamp(
    presentation: &Presentation,
    inputs: &VerificationInputs,
    sub_proof_index: u32,
) -> VcxResult<Option<Option<u64>>> {
    if !cred_def_at(presentation, &inputs.cred_defs, sub_proof_index)?.supports_revocation() {
        return Ok(None);
    }
    Ok(Some(identifier_at(presentation, sub_proof_index)?.timestamp))
}

fn interval_diagnostic(
    referent: &str,
    timestamp: Option<u64>,
    interval: Option<&NonRevokedInterval>,
    now: u64,
) -> Option<VerificationMessage> {
    match (timestamp, interval) {
        (Some(timestamp), Some(interval)) if !interval.contains(timestamp, now) => {
            info!(
                "Timestamp {} of referent {} is outside of its non-revocation interval {:?}",
                timestamp, referent, interval
            );
            Some(VerificationMessage::TimestampOutOfInterval(
                referent.to_owned(),
            ))
        }
        _ => None,
    }
}

fn presence_mismatch(
    sub_proof_index: u32,
    timestamp: Option<u64>,
    kind: &str,
    referent: &str,
) -> AriesVcxError {
    temporal(format!(
        "Timestamp on sub-proof #{} is {} vs. requested {} {}",
        sub_proof_index,
        if timestamp.is_some() {
            "superfluous"
        } else {
            "missing"
        },
        kind,
        referent
    ))
}

fn check_attr_timestamp(
    referent: &str,
    attr_info: &AttributeInfo,
    interval: Option<&NonRevokedInterval>,
    presentation: &Presentation,
    inputs: &VerificationInputs,
) -> VcxResult<Option<VerificationMessage>> {
    let requested_proof = &presentation.requested_proof;
    let sub_proof_index = match (
        requested_proof.revealed_attrs.get(referent),
        requested_proof.unrevealed_attrs.get(referent),
    ) {
        (Some(revealed), _) => revealed.sub_proof_index,
        (None, Some(unrevealed)) => unrevealed.sub_proof_index,
        (None, None) if requested_proof.self_attested_attrs.contains_key(referent) => {
            return Ok(None)
        }
        (None, None) => {
            return Err(malformed(format!(
                "Presentation attributes mismatch requested attribute {} ({:?})",
                referent, attr_info.name
            )))
        }
    };

    let Some(timestamp) = revocable_timestamp(presentation, inputs, sub_proof_index)? else {
        return Ok(None);
    };
    if timestamp.is_some() != interval.is_some() {
        return Err(presence_mismatch(
            sub_proof_index,
            timestamp,
            "attribute",
            referent,
        ));
    }
    Ok(interval_diagnostic(referent, timestamp, interval, inputs.now))
}

fn check_attr_group_timestamp(
    referent: &str,
    interval: Option<&NonRevokedInterval>,
    presentation: &Presentation,
    inputs: &VerificationInputs,
) -> VcxResult<Option<VerificationMessage>> {
    let sub_proof_index = presentation
        .requested_proof
        .revealed_attr_groups
        .get(referent)
        .map(|group| group.sub_proof_index)
        .ok_or_else(|| {
            malformed(format!(
                "Presentation attributes mismatch requested attribute group {}",
                referent
            ))
        })?;

    let Some(timestamp) = revocable_timestamp(presentation, inputs, sub_proof_index)? else {
        return Ok(None);
    };
    if timestamp.is_some() != interval.is_some() {
        return Err(presence_mismatch(
            sub_proof_index,
            timestamp,
            "attribute group",
            referent,
        ));
    }
    Ok(interval_diagnostic(referent, timestamp, interval, inputs.now))
}

fn check_predicate_timestamp(
    referent: &str,
    pred_info: &PredicateInfo,
    interval: Option<&NonRevokedInterval>,
    presentation: &Presentation,
    inputs: &VerificationInputs,
) -> VcxResult<Option<VerificationMessage>> {
    let sub_proof_index = presentation
        .requested_proof
        .predicates
        .get(referent)
        .map(|pred| pred.sub_proof_index)
        .ok_or_else(|| {
            malformed(format!(
                "Presentation predicates mismatch requested predicate {} ({})",
                referent, pred_info.name
            ))
        })?;

    let Some(timestamp) = revocable_timestamp(presentation, inputs, sub_proof_index)? else {
        return Ok(None);
    };
    if timestamp.is_some() != interval.is_some() {
        return Err(presence_mismatch(
            sub_proof_index,
            timestamp,
            "predicate",
            referent,
        ));
    }
    Ok(interval_diagnostic(referent, timestamp, interval, inputs.now))
}

/// Phase 3. Ties every referent of the request to exactly one disposition in the
/// presentation: predicates to a single matching ge-proof, disclosed values to the encodings the
/// proof commits to, self-attested values to unrestricted referents.
pub fn pre_verify(
    proof_req: &PresentationRequest,
    presentation: &Presentation,
) -> VcxResult<Vec<VerificationMessage>> {
    let mut msgs = Vec::new();
    let requested_proof = &presentation.requested_proof;

    let predicates: BTreeMap<_, _> = proof_req.requested_predicates.iter().collect();
    for (&referent, &pred_info) in &predicates {
        let sub_proof_index = requested_proof
            .predicates
            .get(referent)
            .map(|pred| pred.sub_proof_index)
            .ok_or_else(|| malformed(format!("Missing requested predicate '{}'", referent)))?;
        let sub_proof = presentation.sub_proof(sub_proof_index).ok_or_else(|| {
            malformed(format!(
                "Missing sub-proof #{} for predicate '{}'",
                sub_proof_index, referent
            ))
        })?;

        let attr_name = canon(&pred_info.name);
        let candidates: Vec<_> = sub_proof
            .primary_proof
            .ge_proofs
            .iter()
            .map(|ge_proof| &ge_proof.predicate)
            .filter(|predicate| predicate.attr_name == attr_name)
            .collect();
        if candidates.is_empty() {
            return Err(malformed(format!(
                "Missing requested predicate '{}' on attribute {}",
                referent, attr_name
            )));
        }
        let proving = candidates
            .iter()
            .filter(|predicate| {
                predicate.p_type == pred_info.p_type && predicate.value == pred_info.p_value
            })
            .count();
        // every identical predicate requested of this credential carries its own ge-proof
        let expected = predicates
            .iter()
            .filter(|(other, other_info)| {
                requested_proof
                    .predicates
                    .get(**other)
                    .is_some_and(|pred| pred.sub_proof_index == sub_proof_index)
                    && canon(&other_info.name) == attr_name
                    && other_info.p_type == pred_info.p_type
                    && other_info.p_value == pred_info.p_value
            })
            .count();
        if proving != expected {
            return Err(tampered(format!(
                "Predicate {} {} {} of referent '{}' is proven {} times, expected {}",
                attr_name, pred_info.p_type, pred_info.p_value, referent, proving, expected
            )));
        }
    }

    let attributes: BTreeMap<_, _> = proof_req.requested_attributes.iter().collect();
    for (referent, attr_info) in attributes {
        let dispositions = [
            requested_proof.revealed_attrs.contains_key(referent),
            requested_proof.unrevealed_attrs.contains_key(referent),
            requested_proof.self_attested_attrs.contains_key(referent),
            requested_proof.revealed_attr_groups.contains_key(referent),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();
        if dispositions > 1 {
            return Err(tampered(format!(
                "Attribute {} is disclosed in {} ways, expected one",
                referent, dispositions
            )));
        }

        // (attribute name, sub proof index, raw, encoded) of every disclosed value
        let mut disclosed: Vec<(&str, u32, &str, &str)> = Vec::new();

        match (attr_info.name.as_deref(), attr_info.names.as_deref()) {
            (Some(name), None) => {
                if let Some(revealed) = requested_proof.revealed_attrs.get(referent) {
                    disclosed.push((
                        name,
                        revealed.sub_proof_index,
                        &revealed.raw,
                        &revealed.encoded,
                    ));
                } else if requested_proof.self_attested_attrs.contains_key(referent) {
                    if attr_info.has_restrictions() {
                        return Err(tampered(format!(
                            "Attribute {} is self-attested but has restrictions",
                            referent
                        )));
                    }
                    continue;
                } else if requested_proof.unrevealed_attrs.contains_key(referent) {
                    msgs.push(VerificationMessage::UnrevealedAttribute(referent.clone()));
                    continue;
                } else {
                    return Err(malformed(format!(
                        "Missing requested attribute '{}'",
                        referent
                    )));
                }
            }
            (None, Some(names)) => {
                let group = requested_proof
                    .revealed_attr_groups
                    .get(referent)
                    .ok_or_else(|| {
                        malformed(format!("Missing requested attribute group '{}'", referent))
                    })?;
                for name in names {
                    let value = group.values.get(name).ok_or_else(|| {
                        malformed(format!(
                            "Missing attribute '{}' in revealed group '{}'",
                            name, referent
                        ))
                    })?;
                    disclosed.push((name, group.sub_proof_index, &value.raw, &value.encoded));
                }
            }
            _ => {
                return Err(malformed(format!(
                    "Request attribute {} needs exactly one of 'name' and 'names'",
                    referent
                )))
            }
        }

        for (name, sub_proof_index, raw, encoded) in disclosed {
            let committed = presentation
                .sub_proof(sub_proof_index)
                .and_then(|sub_proof| {
                    sub_proof
                        .primary_proof
                        .eq_proof
                        .revealed_attrs
                        .get(&canon(name))
                })
                .ok_or_else(|| malformed(format!("Missing revealed attribute: '{}'", name)))?;
            if committed != encoded || *committed != encode(raw) {
                return Err(tampered(format!(
                    "Encoded representation mismatch for '{}'",
                    name
                )));
            }
        }
    }

    Ok(msgs)
}
