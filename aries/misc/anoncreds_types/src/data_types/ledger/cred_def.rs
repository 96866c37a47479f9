use std::str::FromStr;

use serde_json::Value;

use crate::{
    data_types::identifiers::{cred_def_id::CredentialDefinitionId, schema_id::SchemaId},
    Error,
};

pub const CL_SIGNATURE_TYPE: &str = "CL";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureType {
    CL,
}

impl FromStr for SignatureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CL_SIGNATURE_TYPE => Ok(Self::CL),
            _ => Err(err_msg!(ConversionError, "Invalid signature type: {}", s)),
        }
    }
}

/// Public keys of a credential definition. The revocation key is only present when the
/// issuer enabled revocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialDefinitionData {
    pub primary: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDefinition {
    pub id: CredentialDefinitionId,
    pub schema_id: SchemaId,
    #[serde(rename = "type")]
    pub signature_type: SignatureType,
    pub tag: String,
    pub value: CredentialDefinitionData,
    pub issuer_id: String,
}

impl CredentialDefinition {
    pub fn supports_revocation(&self) -> bool {
        self.value
            .revocation
            .as_ref()
            .is_some_and(|key| !key.is_null())
    }
}
