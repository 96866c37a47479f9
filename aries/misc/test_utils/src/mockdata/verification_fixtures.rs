use std::collections::HashMap;

use anoncreds_types::{
    data_types::{
        identifiers::{
            cred_def_id::CredentialDefinitionId, rev_reg_def_id::RevocationRegistryDefinitionId,
            schema_id::SchemaId,
        },
        ledger::rev_reg_def::RevocationRegistryDefinitionMetadata,
        pres_request::PresentationRequest,
        presentation::Presentation,
    },
    utils::encoding::encode,
};
use aries_vcx_anoncreds::anoncreds::base_anoncreds::{
    CredentialDefinitionsMap, RevocationRegistriesMap, RevocationRegistryDefinitionsMap,
    SchemasMap,
};

use super::{cred_def, rev_reg, rev_reg_def, schema};
use crate::constants::{
    CRED_DEF_ID, FIXTURE_NOW, REV_CRED_DEF_ID, REV_REG_DELTA_TIMESTAMP, REV_REG_ID, SCHEMA_ID,
};

/// A proof request, a presentation answering it and the ledger objects it was built on.
#[derive(Debug, Clone)]
pub struct VerifierFixture {
    pub proof_req: PresentationRequest,
    pub presentation: Presentation,
    pub schemas: SchemasMap,
    pub cred_defs: CredentialDefinitionsMap,
    pub rev_reg_defs: RevocationRegistryDefinitionsMap,
    pub rev_reg_defs_metadata:
        HashMap<RevocationRegistryDefinitionId, RevocationRegistryDefinitionMetadata>,
    pub rev_regs: RevocationRegistriesMap,
    pub now: u64,
}

fn proof_req(cred_def_id: &str, revocable: bool) -> PresentationRequest {
    let mut req = json!({
        "nonce": "1234567890",
        "name": "proof",
        "version": "1.0",
        "requested_attributes": {
            "attr_name": {"name": "name", "restrictions": [{"cred_def_id": cred_def_id}]}
        },
        "requested_predicates": {
            "pred_age": {"name": "age", "p_type": ">=", "p_value": 18}
        }
    });
    if revocable {
        req["non_revoked"] = json!({"to": FIXTURE_NOW});
    }
    serde_json::from_value(req).unwrap_or_else(|err| panic!("bad proof request fixture: {err}"))
}

fn presentation(cred_def_id: &str, timestamp: Option<u64>) -> Presentation {
    let encoded = encode("Alex");
    serde_json::from_value(json!({
        "proof": {
            "proofs": [{
                "primary_proof": {
                    "eq_proof": {
                        "revealed_attrs": {"name": encoded},
                        "a_prime": "1",
                        "e": "1",
                        "v": "1",
                        "m2": "1"
                    },
                    "ge_proofs": [{
                        "u": {"0": "1"},
                        "predicate": {"attr_name": "age", "p_type": "GE", "value": 18}
                    }]
                },
                "non_revoc_proof": timestamp.map(|_| json!({"x_list": {}, "c_list": {}}))
            }],
            "aggregated_proof": {"c_hash": "1", "c_list": []}
        },
        "requested_proof": {
            "revealed_attrs": {
                "attr_name": {"sub_proof_index": 0, "raw": "Alex", "encoded": encoded}
            },
            "self_attested_attrs": {},
            "unrevealed_attrs": {},
            "predicates": {"pred_age": {"sub_proof_index": 0}}
        },
        "identifiers": [{
            "schema_id": SCHEMA_ID,
            "cred_def_id": cred_def_id,
            "rev_reg_id": timestamp.map(|_| REV_REG_ID),
            "timestamp": timestamp
        }]
    }))
    .unwrap_or_else(|err| panic!("bad presentation fixture: {err}"))
}

/// Disclosed `name` and proven `age >= 18` from a credential without revocation support.
pub fn revealed_and_predicate() -> VerifierFixture {
    VerifierFixture {
        proof_req: proof_req(CRED_DEF_ID, false),
        presentation: presentation(CRED_DEF_ID, None),
        schemas: HashMap::from([(SchemaId::new_unchecked(SCHEMA_ID), schema())]),
        cred_defs: HashMap::from([(
            CredentialDefinitionId::new_unchecked(CRED_DEF_ID),
            cred_def(CRED_DEF_ID),
        )]),
        rev_reg_defs: HashMap::new(),
        rev_reg_defs_metadata: HashMap::new(),
        rev_regs: HashMap::new(),
        now: FIXTURE_NOW,
    }
}

/// Same disclosure from a revocable credential, asked non-revoked up to now and proven at
/// [REV_REG_DELTA_TIMESTAMP].
pub fn revocable_revealed_and_predicate() -> VerifierFixture {
    let rev_reg_id = RevocationRegistryDefinitionId::new_unchecked(REV_REG_ID);
    let (def, meta) = rev_reg_def();
    VerifierFixture {
        proof_req: proof_req(REV_CRED_DEF_ID, true),
        presentation: presentation(REV_CRED_DEF_ID, Some(REV_REG_DELTA_TIMESTAMP)),
        schemas: HashMap::from([(SchemaId::new_unchecked(SCHEMA_ID), schema())]),
        cred_defs: HashMap::from([(
            CredentialDefinitionId::new_unchecked(REV_CRED_DEF_ID),
            cred_def(REV_CRED_DEF_ID),
        )]),
        rev_reg_defs: HashMap::from([(rev_reg_id.clone(), def)]),
        rev_reg_defs_metadata: HashMap::from([(rev_reg_id.clone(), meta)]),
        rev_regs: HashMap::from([(
            rev_reg_id,
            HashMap::from([(REV_REG_DELTA_TIMESTAMP, rev_reg())]),
        )]),
        now: FIXTURE_NOW,
    }
}
