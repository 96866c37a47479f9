use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{
    identifiers::{
        cred_def_id::CredentialDefinitionId, rev_reg_def_id::RevocationRegistryDefinitionId,
        schema_id::SchemaId,
    },
    pres_request::{PredicateTypes, PredicateValue},
};

/// Presentation produced by a holder. `proof` and `requested_proof` are mandatory.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Presentation {
    pub proof: Proof,
    pub requested_proof: RequestedProof,
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
}

impl Presentation {
    pub fn identifier(&self, sub_proof_index: u32) -> Option<&Identifier> {
        self.identifiers.get(sub_proof_index as usize)
    }

    pub fn sub_proof(&self, sub_proof_index: u32) -> Option<&SubProof> {
        self.proof.proofs.get(sub_proof_index as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Proof {
    pub proofs: Vec<SubProof>,
    #[serde(default)]
    pub aggregated_proof: Value,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SubProof {
    pub primary_proof: PrimaryProof,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_revoc_proof: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PrimaryProof {
    pub eq_proof: EqProof,
    #[serde(default)]
    pub ge_proofs: Vec<GeProof>,
}

/// Equality proof; only the revealed attribute encodings are interpreted here, the
/// remaining cryptographic members are carried through untouched.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EqProof {
    #[serde(default)]
    pub revealed_attrs: HashMap<String, String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GeProof {
    pub predicate: Predicate,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Predicate {
    pub attr_name: String,
    pub p_type: PredicateTypes,
    pub value: PredicateValue,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequestedProof {
    #[serde(default)]
    pub revealed_attrs: HashMap<String, RevealedAttributeInfo>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub revealed_attr_groups: HashMap<String, RevealedAttributeGroupInfo>,
    #[serde(default)]
    pub self_attested_attrs: HashMap<String, String>,
    #[serde(default)]
    pub unrevealed_attrs: HashMap<String, SubProofReferent>,
    #[serde(default)]
    pub predicates: HashMap<String, SubProofReferent>,
}

impl RequestedProof {
    /// Sub proof backing an attribute referent, whichever way it was disclosed.
    pub fn attribute_sub_proof_index(&self, referent: &str) -> Option<u32> {
        self.revealed_attrs
            .get(referent)
            .map(|info| info.sub_proof_index)
            .or_else(|| {
                self.revealed_attr_groups
                    .get(referent)
                    .map(|group| group.sub_proof_index)
            })
            .or_else(|| {
                self.unrevealed_attrs
                    .get(referent)
                    .map(|info| info.sub_proof_index)
            })
    }

    /// Every `(referent, sub_proof_index)` pair backed by a credential.
    pub fn credential_backed_referents(&self) -> Vec<(&str, u32)> {
        self.revealed_attrs
            .iter()
            .map(|(referent, info)| (referent.as_str(), info.sub_proof_index))
            .chain(
                self.revealed_attr_groups
                    .iter()
                    .map(|(referent, group)| (referent.as_str(), group.sub_proof_index)),
            )
            .chain(
                self.unrevealed_attrs
                    .iter()
                    .map(|(referent, info)| (referent.as_str(), info.sub_proof_index)),
            )
            .chain(
                self.predicates
                    .iter()
                    .map(|(referent, info)| (referent.as_str(), info.sub_proof_index)),
            )
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubProofReferent {
    pub sub_proof_index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RevealedAttributeInfo {
    pub sub_proof_index: u32,
    pub raw: String,
    pub encoded: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RevealedAttributeGroupInfo {
    pub sub_proof_index: u32,
    pub values: HashMap<String, AttributeValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttributeValue {
    pub raw: String,
    pub encoded: String,
}

/// Ledger objects behind one sub proof.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identifier {
    pub schema_id: SchemaId,
    pub cred_def_id: CredentialDefinitionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rev_reg_id: Option<RevocationRegistryDefinitionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}
