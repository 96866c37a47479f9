use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationRegistryDeltaValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_accum: Option<Value>,
    pub accum: Value,
    #[serde(default)]
    pub issued: Vec<u32>,
    #[serde(default)]
    pub revoked: Vec<u32>,
}

/// Accumulator change between two points in time, resolved by the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevocationRegistryDelta {
    pub value: RevocationRegistryDeltaValue,
}

impl RevocationRegistryDelta {
    pub fn is_revoked(&self, cred_rev_id: u32) -> bool {
        self.value.revoked.contains(&cred_rev_id)
    }
}
