#![allow(clippy::result_large_err)]
#![allow(clippy::large_enum_variant)]

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde;

#[macro_use]
extern crate serde_json;

pub extern crate messages;

pub use anoncreds_types;
pub use aries_vcx_anoncreds;
pub use aries_vcx_ledger;

#[macro_use]
pub mod utils;

#[macro_use]
pub mod handlers;

pub mod protocols;

pub mod common;
pub mod errors;
