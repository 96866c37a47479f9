use messages::{
    decorators::{thread::Thread, timing::Timing},
    msg_fields::protocols::report_problem::{
        Description, ProblemReport, ProblemReportContent, ProblemReportDecorators,
    },
};
use uuid::Uuid;

/// Problem report for the exchange on `thread_id`. `code` is machine readable, `text` is the
/// human explanation sent as `en`.
pub fn build_problem_report_msg(code: &str, text: Option<&str>, thread_id: &str) -> ProblemReport {
    let id = Uuid::new_v4().to_string();
    let description = match text {
        Some(text) => Description::builder().code(code).en(text).build(),
        None => Description::builder().code(code).build(),
    };
    let content = ProblemReportContent::builder()
        .description(description)
        .build();

    let decorators = ProblemReportDecorators::builder()
        .thread(Thread::builder().thid(thread_id.to_owned()).build())
        .timing(Timing::now_out())
        .build();

    ProblemReport::builder()
        .id(id)
        .content(content)
        .decorators(decorators)
        .build()
}

#[cfg(test)]
pub mod unit_tests {
    use super::*;

    #[test]
    fn test_problem_report_is_threaded_and_timed() {
        let msg = build_problem_report_msg("request-declined", Some("not today"), "12345");

        assert_eq!(msg.content.description.code, "request-declined");
        assert_eq!(msg.content.description.en.as_deref(), Some("not today"));
        assert_eq!(msg.decorators.thread.unwrap().thid, "12345");
        assert!(msg.decorators.timing.unwrap().out_time.is_some());
    }

    #[test]
    fn test_problem_report_without_text() {
        let msg = build_problem_report_msg("abandoned", None, "12345");

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["description"], serde_json::json!({"code": "abandoned"}));
    }
}
