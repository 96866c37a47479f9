#[macro_use]
mod macros;

pub mod identifiers;
pub mod nonce;
pub mod pres_request;
pub mod presentation;
pub mod credential;

#[cfg(feature = "ledger")]
pub mod ledger;
#[cfg(feature = "messages")]
pub mod messages;
