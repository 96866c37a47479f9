use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Struct representing a complete message (apart from the `@type` field) as composed from the
/// three parts: `@id`, protocol specific content and decorators.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct MsgParts<C, D = NoDecorators> {
    #[builder(setter(into))]
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(flatten)]
    pub content: C,
    #[serde(flatten)]
    pub decorators: D,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NoDecorators;
