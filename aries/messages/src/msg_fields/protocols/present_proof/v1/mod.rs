//! Module containing the `present proof` protocol messages, as defined in the [RFC](<https://github.com/hyperledger/aries-rfcs/blob/main/features/0037-present-proof/README.md>).

pub mod ack;
pub mod present;
pub mod propose;
pub mod request;

use derive_more::From;

use self::{
    ack::AckPresentationV1, present::PresentationV1, propose::ProposePresentationV1,
    request::RequestPresentationV1,
};
use crate::decorators::thread::Thread;

#[derive(Clone, Debug, From, PartialEq)]
pub enum PresentProofV1 {
    ProposePresentation(ProposePresentationV1),
    RequestPresentation(RequestPresentationV1),
    Presentation(PresentationV1),
    Ack(AckPresentationV1),
}

impl PresentProofV1 {
    pub fn thread(&self) -> Option<&Thread> {
        match self {
            Self::ProposePresentation(msg) => msg.decorators.thread.as_ref(),
            Self::RequestPresentation(msg) => msg.decorators.thread.as_ref(),
            Self::Presentation(msg) => Some(&msg.decorators.thread),
            Self::Ack(msg) => Some(&msg.decorators.thread),
        }
    }
}
