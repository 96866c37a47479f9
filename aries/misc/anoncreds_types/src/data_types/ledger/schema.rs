use crate::data_types::identifiers::schema_id::SchemaId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub id: SchemaId,
    pub name: String,
    pub version: String,
    pub attr_names: Vec<String>,
    pub issuer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<u32>,
}
