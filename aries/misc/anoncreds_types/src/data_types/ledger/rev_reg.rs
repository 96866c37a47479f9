use serde_json::Value;

/// Accumulator value of a registry at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevocationRegistry {
    pub value: RevocationRegistryValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevocationRegistryValue {
    pub accum: Value,
}
