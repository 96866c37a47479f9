use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Struct representing the `~thread` decorator from its [RFC](<https://github.com/hyperledger/aries-rfcs/blob/main/concepts/0008-message-id-and-threading/README.md>).
#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq, TypedBuilder)]
pub struct Thread {
    #[builder(setter(into))]
    pub thid: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pthid: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_order: Option<u32>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_orders: Option<HashMap<String, u32>>,
}

impl Thread {
    pub fn new(thid: impl Into<String>) -> Self {
        Self::builder().thid(thid).build()
    }
}

#[cfg(test)]
pub mod tests {
    use serde_json::json;

    use super::*;

    pub fn make_extended_thread() -> Thread {
        Thread::builder()
            .thid("test_thid")
            .pthid("test_pthid")
            .sender_order(0)
            .received_orders(HashMap::from([("did:sov:123".to_owned(), 1)]))
            .build()
    }

    #[test]
    fn test_minimal_thread() {
        let thread = Thread::new("test_thid");
        assert_eq!(serde_json::to_value(&thread).unwrap(), json!({"thid": "test_thid"}));
    }

    #[test]
    fn test_extended_thread() {
        let thread = make_extended_thread();
        let expected = json!({
            "thid": "test_thid",
            "pthid": "test_pthid",
            "sender_order": 0,
            "received_orders": {"did:sov:123": 1}
        });
        assert_eq!(serde_json::to_value(&thread).unwrap(), expected);
        assert_eq!(serde_json::from_value::<Thread>(expected).unwrap(), thread);
    }
}
