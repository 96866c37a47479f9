use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
    decorators::{thread::Thread, timing::Timing},
    msg_parts::MsgParts,
};

pub type ProblemReport = MsgParts<ProblemReportContent, ProblemReportDecorators>;

/// Tells the peer an exchange was given up; the receiver abandons its side of the thread.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct ProblemReportContent {
    pub description: Description,
}

/// Machine readable `code` plus an optional english explanation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, TypedBuilder)]
pub struct Description {
    #[builder(setter(into))]
    pub code: String,
    #[builder(default, setter(strip_option, into))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default, PartialEq, TypedBuilder)]
pub struct ProblemReportDecorators {
    #[builder(default, setter(strip_option))]
    #[serde(rename = "~thread")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[builder(default, setter(strip_option))]
    #[serde(rename = "~timing")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{misc::test_utils, msg_types::ReportProblemTypeV1_0, AriesMessage};

    #[test]
    fn test_rejection_report_on_exchange_thread() {
        let content = ProblemReportContent::builder()
            .description(
                Description::builder()
                    .code("presentation-rejected")
                    .en("revealed value for attr_name does not match its encoding")
                    .build(),
            )
            .build();
        let decorators = ProblemReportDecorators::builder()
            .thread(Thread::new("request-1"))
            .build();

        let expected = json!({
            "description": {
                "code": "presentation-rejected",
                "en": "revealed value for attr_name does not match its encoding"
            },
            "~thread": {"thid": "request-1"}
        });

        test_utils::test_msg(content, decorators, ReportProblemTypeV1_0::ProblemReport, expected);
    }

    #[test]
    fn test_code_only_report_from_legacy_peer() {
        let raw = json!({
            "@id": "report-1",
            "@type": "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/report-problem/1.0/problem-report",
            "description": {"code": "request-declined"}
        });

        let report = match serde_json::from_value::<AriesMessage>(raw).unwrap() {
            AriesMessage::ReportProblem(report) => report,
            other => panic!("unexpected message: {other:?}"),
        };
        assert_eq!(report.content.description.code, "request-declined");
        assert_eq!(report.content.description.en, None);
        assert_eq!(report.decorators, ProblemReportDecorators::default());
    }
}
