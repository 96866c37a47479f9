use std::collections::HashMap;

use serde_json::Value;

use super::identifiers::{
    cred_def_id::CredentialDefinitionId, rev_reg_def_id::RevocationRegistryDefinitionId,
    schema_id::SchemaId,
};

/// Credential as stored in the holder's wallet, without its signature material.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CredentialInfo {
    pub referent: String,
    #[serde(rename = "attrs")]
    pub attributes: HashMap<String, String>,
    pub schema_id: SchemaId,
    pub cred_def_id: CredentialDefinitionId,
    pub rev_reg_id: Option<RevocationRegistryDefinitionId>,
    pub cred_rev_id: Option<u32>,
}

impl CredentialInfo {
    pub fn is_revocable(&self) -> bool {
        self.rev_reg_id.is_some()
    }
}

/// Holder side answer to a proof request: which credential backs which referent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequestedCredentials {
    #[serde(default)]
    pub self_attested_attributes: HashMap<String, String>,
    #[serde(default)]
    pub requested_attributes: HashMap<String, RequestedAttribute>,
    #[serde(default)]
    pub requested_predicates: HashMap<String, RequestedPredicate>,
}

impl RequestedCredentials {
    /// Credential id referenced by an attribute or predicate referent.
    pub fn cred_id_for(&self, referent: &str) -> Option<&str> {
        self.requested_attributes
            .get(referent)
            .map(|attr| attr.cred_id.as_str())
            .or_else(|| {
                self.requested_predicates
                    .get(referent)
                    .map(|pred| pred.cred_id.as_str())
            })
    }

    pub fn set_timestamp(&mut self, referent: &str, timestamp: u64) {
        if let Some(attr) = self.requested_attributes.get_mut(referent) {
            attr.timestamp = Some(timestamp);
        }
        if let Some(pred) = self.requested_predicates.get_mut(referent) {
            pred.timestamp = Some(timestamp);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequestedAttribute {
    pub cred_id: String,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RequestedPredicate {
    pub cred_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Accumulator witness of one credential at one registry timestamp.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CredentialRevocationState {
    pub witness: Value,
    pub rev_reg: Value,
    pub timestamp: u64,
}

/// `rev_reg_id -> timestamp -> state`
pub type RevocationStatesMap = HashMap<String, HashMap<u64, CredentialRevocationState>>;
