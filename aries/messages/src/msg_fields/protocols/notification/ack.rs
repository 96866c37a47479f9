use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::decorators::{thread::Thread, timing::Timing};

/// Body shared by every protocol's `ack`; protocols flatten it into their own content.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct AckContent {
    pub status: AckStatus,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AckStatus {
    /// The acknowledged message was processed.
    Ok,
    Fail,
    /// Processing continues; a later ack settles it.
    Pending,
}

/// An ack always refers back to the thread it acknowledges.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, TypedBuilder)]
pub struct AckDecorators {
    #[serde(rename = "~thread")]
    pub thread: Thread,
    #[builder(default, setter(strip_option))]
    #[serde(rename = "~timing")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
}
