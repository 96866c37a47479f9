use thiserror::Error;

pub type MsgTypeResult<T> = Result<T, MsgTypeError>;

#[derive(Debug, Error, PartialEq)]
pub enum MsgTypeError {
    #[error("Unknown message type prefix: {0}")]
    UnknownPrefix(String),
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),
    #[error("Unknown message kind: {0}")]
    UnknownMessageKind(String),
}
