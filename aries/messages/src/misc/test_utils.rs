use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::{msg_parts::MsgParts, msg_types::MessageType, AriesMessage};

/// Builds a message from its parts, checks its serialized form against `expected` (with
/// `@id` and `@type` added) and checks that it deserializes back into the same message.
pub fn test_msg<C, D, T>(content: C, decorators: D, msg_kind: T, mut expected: Value)
where
    AriesMessage: From<MsgParts<C, D>>,
    C: Serialize + DeserializeOwned,
    D: Serialize + DeserializeOwned,
    T: Into<MessageType>,
{
    let id = "test".to_owned();
    let msg_type = msg_kind.into().to_string();

    let object = expected.as_object_mut().expect("expected message must be an object");
    object.insert("@id".to_owned(), json!(id));
    object.insert("@type".to_owned(), json!(msg_type));

    let msg = MsgParts::builder()
        .id(id)
        .content(content)
        .decorators(decorators)
        .build();
    let msg = AriesMessage::from(msg);

    assert_eq!(serde_json::to_value(&msg).unwrap(), expected);
    assert_eq!(serde_json::from_value::<AriesMessage>(expected).unwrap(), msg);
}
