#[macro_use]
extern crate log;

#[macro_use]
extern crate serde;

mod config;
mod error;
mod handlers;
mod responder;
mod storage;

pub use config::ExchangeConfig;
pub use error::{AgentError, AgentErrorKind, AgentResult};
pub use handlers::{
    prover::REQUEST_DECLINED_CODE, verifier::PRESENTATION_REJECTED_CODE, ExchangeManager,
    ABANDONED_CODE,
};
pub use proof_exchange;
pub use responder::Responder;
