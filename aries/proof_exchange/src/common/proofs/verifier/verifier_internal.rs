use std::collections::HashMap;

use anoncreds_types::data_types::{
    identifiers::rev_reg_def_id::RevocationRegistryDefinitionId,
    ledger::rev_reg_def::RevocationRegistryDefinitionMetadata,
    presentation::{Identifier, Presentation},
};
use aries_vcx_anoncreds::anoncreds::base_anoncreds::{
    CredentialDefinitionsMap, RevocationRegistriesMap, RevocationRegistryDefinitionsMap,
    SchemasMap,
};
use aries_vcx_ledger::ledger::base_ledger::AnoncredsLedgerRead;

use super::VerificationInputs;
use crate::{errors::error::prelude::*, utils::now_secs};

pub async fn build_schemas_json_verifier(
    ledger: &impl AnoncredsLedgerRead,
    identifiers: &[Identifier],
) -> VcxResult<SchemasMap> {
    trace!("build_schemas_json_verifier >>");
    let mut rtn: SchemasMap = HashMap::new();

    for identifier in identifiers {
        if !rtn.contains_key(&identifier.schema_id) {
            let schema = ledger.get_schema(&identifier.schema_id).await.map_err(|err| {
                AriesVcxError::from(err)
                    .extend(format!("Cannot get schema {}", identifier.schema_id))
            })?;
            rtn.insert(identifier.schema_id.clone(), schema);
        }
    }

    Ok(rtn)
}

pub async fn build_cred_defs_json_verifier(
    ledger: &impl AnoncredsLedgerRead,
    identifiers: &[Identifier],
) -> VcxResult<CredentialDefinitionsMap> {
    trace!("build_cred_defs_json_verifier >>");
    let mut rtn: CredentialDefinitionsMap = HashMap::new();

    for identifier in identifiers {
        if !rtn.contains_key(&identifier.cred_def_id) {
            let cred_def = ledger
                .get_cred_def(&identifier.cred_def_id)
                .await
                .map_err(|err| {
                    AriesVcxError::from(err).extend(format!(
                        "Cannot get credential definition {}",
                        identifier.cred_def_id
                    ))
                })?;
            rtn.insert(identifier.cred_def_id.clone(), cred_def);
        }
    }

    Ok(rtn)
}

pub async fn build_rev_reg_defs_json(
    ledger: &impl AnoncredsLedgerRead,
    identifiers: &[Identifier],
) -> VcxResult<(
    RevocationRegistryDefinitionsMap,
    HashMap<RevocationRegistryDefinitionId, RevocationRegistryDefinitionMetadata>,
)> {
    trace!("build_rev_reg_defs_json >>");
    let mut defs: RevocationRegistryDefinitionsMap = HashMap::new();
    let mut metas = HashMap::new();

    for rev_reg_id in identifiers.iter().filter_map(|i| i.rev_reg_id.as_ref()) {
        if !defs.contains_key(rev_reg_id) {
            let (rev_reg_def, meta) =
                ledger.get_rev_reg_def_json(rev_reg_id).await.map_err(|err| {
                    AriesVcxError::from(err)
                        .extend(format!("Cannot get revocation registry {}", rev_reg_id))
                })?;
            defs.insert(rev_reg_id.clone(), rev_reg_def);
            metas.insert(rev_reg_id.clone(), meta);
        }
    }

    Ok((defs, metas))
}

/// Accumulator entries at every `(registry, timestamp)` the presentation was proven at.
pub async fn build_rev_reg_json(
    ledger: &impl AnoncredsLedgerRead,
    identifiers: &[Identifier],
) -> VcxResult<RevocationRegistriesMap> {
    trace!("build_rev_reg_json >>");
    let mut rtn: RevocationRegistriesMap = HashMap::new();

    for identifier in identifiers {
        let (Some(rev_reg_id), Some(timestamp)) = (&identifier.rev_reg_id, identifier.timestamp)
        else {
            continue;
        };
        let entries = rtn.entry(rev_reg_id.clone()).or_default();
        if !entries.contains_key(&timestamp) {
            let (rev_reg, _) = ledger.get_rev_reg(rev_reg_id, timestamp).await?;
            entries.insert(timestamp, rev_reg);
        }
    }

    Ok(rtn)
}

/// Fetches from `ledger` every object `presentation` refers to.
pub async fn build_verification_inputs(
    ledger: &impl AnoncredsLedgerRead,
    presentation: &Presentation,
    clock_skew_secs: u64,
) -> VcxResult<VerificationInputs> {
    let identifiers = &presentation.identifiers;
    let (rev_reg_defs, rev_reg_defs_metadata) = build_rev_reg_defs_json(ledger, identifiers).await?;

    Ok(VerificationInputs::builder()
        .schemas(build_schemas_json_verifier(ledger, identifiers).await?)
        .cred_defs(build_cred_defs_json_verifier(ledger, identifiers).await?)
        .rev_reg_defs(rev_reg_defs)
        .rev_reg_defs_metadata(rev_reg_defs_metadata)
        .rev_regs(build_rev_reg_json(ledger, identifiers).await?)
        .now(now_secs())
        .clock_skew_secs(clock_skew_secs)
        .build())
}
