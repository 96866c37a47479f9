use std::{fmt, str::FromStr};

use derive_more::From;
use strum_macros::{AsRefStr, EnumString};

use crate::error::{MsgTypeError, MsgTypeResult};

pub const DIDCOMM_PREFIX: &str = "https://didcomm.org";
pub const DID_SOV_PREFIX: &str = "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec";

const PRESENT_PROOF_V1_0: &str = "present-proof/1.0";
const REPORT_PROBLEM_V1_0: &str = "report-problem/1.0";

#[derive(Copy, Clone, Debug, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PresentProofTypeV1_0 {
    ProposePresentation,
    RequestPresentation,
    Presentation,
    Ack,
    PresentationPreview,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ReportProblemTypeV1_0 {
    ProblemReport,
}

/// Fully qualified `@type` of a message.
#[derive(Copy, Clone, Debug, From, PartialEq, Eq)]
pub enum MessageType {
    PresentProofV1_0(PresentProofTypeV1_0),
    ReportProblemV1_0(ReportProblemTypeV1_0),
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PresentProofV1_0(kind) => {
                write!(f, "{DIDCOMM_PREFIX}/{PRESENT_PROOF_V1_0}/{}", kind.as_ref())
            }
            Self::ReportProblemV1_0(kind) => {
                write!(f, "{DIDCOMM_PREFIX}/{REPORT_PROBLEM_V1_0}/{}", kind.as_ref())
            }
        }
    }
}

impl FromStr for MessageType {
    type Err = MsgTypeError;

    fn from_str(s: &str) -> MsgTypeResult<Self> {
        let rest = s
            .strip_prefix(DIDCOMM_PREFIX)
            .or_else(|| s.strip_prefix(DID_SOV_PREFIX))
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| MsgTypeError::UnknownPrefix(s.to_owned()))?;

        let (protocol, kind) = rest
            .rsplit_once('/')
            .ok_or_else(|| MsgTypeError::UnsupportedProtocol(rest.to_owned()))?;

        match protocol {
            PRESENT_PROOF_V1_0 => PresentProofTypeV1_0::from_str(kind)
                .map(Self::from)
                .map_err(|_| MsgTypeError::UnknownMessageKind(kind.to_owned())),
            REPORT_PROBLEM_V1_0 => ReportProblemTypeV1_0::from_str(kind)
                .map(Self::from)
                .map_err(|_| MsgTypeError::UnknownMessageKind(kind.to_owned())),
            other => Err(MsgTypeError::UnsupportedProtocol(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_display() {
        assert_eq!(
            MessageType::from(PresentProofTypeV1_0::RequestPresentation).to_string(),
            "https://didcomm.org/present-proof/1.0/request-presentation"
        );
        assert_eq!(
            MessageType::from(ReportProblemTypeV1_0::ProblemReport).to_string(),
            "https://didcomm.org/report-problem/1.0/problem-report"
        );
    }

    #[test]
    fn test_message_type_parses_both_prefixes() {
        let expected = MessageType::from(PresentProofTypeV1_0::Presentation);
        assert_eq!(
            MessageType::from_str("https://didcomm.org/present-proof/1.0/presentation").unwrap(),
            expected
        );
        assert_eq!(
            MessageType::from_str(
                "did:sov:BzCbsNYhMrjHiqZDTUASHg;spec/present-proof/1.0/presentation"
            )
            .unwrap(),
            expected
        );
    }

    #[test]
    fn test_message_type_rejects_unknown() {
        assert_eq!(
            MessageType::from_str("https://didcomm.org/present-proof/2.0/presentation")
                .unwrap_err(),
            MsgTypeError::UnsupportedProtocol("present-proof/2.0".to_owned())
        );
        assert_eq!(
            MessageType::from_str("https://didcomm.org/present-proof/1.0/offer").unwrap_err(),
            MsgTypeError::UnknownMessageKind("offer".to_owned())
        );
        assert!(matches!(
            MessageType::from_str("https://example.org/present-proof/1.0/ack"),
            Err(MsgTypeError::UnknownPrefix(_))
        ));
    }
}
