pub mod mock_holder;
pub mod mock_ledger;
pub mod mock_verifier;
pub mod verification_fixtures;

use anoncreds_types::data_types::{
    credential::CredentialInfo,
    identifiers::{
        cred_def_id::CredentialDefinitionId, rev_reg_def_id::RevocationRegistryDefinitionId,
        schema_id::SchemaId,
    },
    ledger::{
        cred_def::{CredentialDefinition, CredentialDefinitionData, SignatureType},
        rev_reg::{RevocationRegistry, RevocationRegistryValue},
        rev_reg_def::{
            RegistryType, RevocationRegistryDefinition, RevocationRegistryDefinitionMetadata,
            RevocationRegistryDefinitionValue,
        },
        rev_reg_delta::{RevocationRegistryDelta, RevocationRegistryDeltaValue},
        schema::Schema,
    },
};

use crate::constants::{
    CRED_DEF_ID, ISSUER_DID, REV_CRED_DEF_ID, REV_REG_ID, REV_REG_TXN_TIME, SCHEMA_ID,
    TAILS_HASH,
};

pub const SCHEMA_ATTRS: [&str; 5] = ["name", "sex", "degree", "age", "height"];

/// Wallet credential without revocation support.
pub fn credential_info(id: &str, cred_def_id: &str, attrs: &[(&str, &str)]) -> CredentialInfo {
    CredentialInfo {
        referent: id.to_owned(),
        attributes: attrs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect(),
        schema_id: SchemaId::new_unchecked(SCHEMA_ID),
        cred_def_id: CredentialDefinitionId::new_unchecked(cred_def_id),
        rev_reg_id: None,
        cred_rev_id: None,
    }
}

fn default_attrs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Alex"),
        ("sex", "male"),
        ("degree", "maths"),
        ("age", "28"),
        ("height", "175"),
    ]
}

/// Credential issued under [REV_CRED_DEF_ID] with index `cred_rev_id` in [REV_REG_ID].
pub fn revocable_credential(id: &str, cred_rev_id: u32) -> CredentialInfo {
    CredentialInfo {
        rev_reg_id: Some(RevocationRegistryDefinitionId::new_unchecked(REV_REG_ID)),
        cred_rev_id: Some(cred_rev_id),
        ..credential_info(id, REV_CRED_DEF_ID, &default_attrs())
    }
}

/// Credential issued under [CRED_DEF_ID].
pub fn plain_credential(id: &str) -> CredentialInfo {
    credential_info(id, CRED_DEF_ID, &default_attrs())
}

pub fn schema() -> Schema {
    Schema {
        id: SchemaId::new_unchecked(SCHEMA_ID),
        name: "gvt".to_owned(),
        version: "1.0".to_owned(),
        attr_names: SCHEMA_ATTRS.iter().map(|attr| (*attr).to_owned()).collect(),
        issuer_id: ISSUER_DID.to_owned(),
        seq_no: Some(15),
    }
}

/// Credential definition `id`; carries a revocation key only for [REV_CRED_DEF_ID].
pub fn cred_def(id: &str) -> CredentialDefinition {
    let revocable = id == REV_CRED_DEF_ID;
    CredentialDefinition {
        id: CredentialDefinitionId::new_unchecked(id),
        schema_id: SchemaId::new_unchecked(SCHEMA_ID),
        signature_type: SignatureType::CL,
        tag: if revocable { "revocable" } else { "tag" }.to_owned(),
        value: CredentialDefinitionData {
            primary: json!({
                "n": "94752773003676148918",
                "s": "1",
                "r": {},
                "rctxt": "1",
                "z": "1"
            }),
            revocation: revocable.then(|| json!({"g": "1 0", "pk": "1 0", "y": "1 0"})),
        },
        issuer_id: ISSUER_DID.to_owned(),
    }
}

pub fn rev_reg_def() -> (
    RevocationRegistryDefinition,
    RevocationRegistryDefinitionMetadata,
) {
    (
        RevocationRegistryDefinition {
            id: RevocationRegistryDefinitionId::new_unchecked(REV_REG_ID),
            issuer_id: ISSUER_DID.to_owned(),
            revoc_def_type: RegistryType::CL_ACCUM,
            tag: "tag1".to_owned(),
            cred_def_id: CredentialDefinitionId::new_unchecked(REV_CRED_DEF_ID),
            value: RevocationRegistryDefinitionValue {
                max_cred_num: 10,
                public_keys: json!({"accumKey": {"z": "1 0"}}),
                tails_hash: TAILS_HASH.to_owned(),
                tails_location: format!("/tmp/tails/{}", TAILS_HASH),
            },
        },
        RevocationRegistryDefinitionMetadata {
            txn_time: Some(REV_REG_TXN_TIME),
        },
    )
}

pub fn rev_reg() -> RevocationRegistry {
    RevocationRegistry {
        value: RevocationRegistryValue {
            accum: json!("21 11792B036AED0AAA12A4"),
        },
    }
}

/// Delta issuing indexes 1 to 10 and revoking `revoked`.
pub fn rev_reg_delta(revoked: &[u32]) -> RevocationRegistryDelta {
    RevocationRegistryDelta {
        value: RevocationRegistryDeltaValue {
            prev_accum: None,
            accum: json!("21 11792B036AED0AAA12A4"),
            issued: (1..=10).filter(|idx| !revoked.contains(idx)).collect(),
            revoked: revoked.to_vec(),
        },
    }
}
