extern crate log;

#[macro_use]
extern crate serde;

#[cfg(test)]
#[macro_use]
extern crate serde_json;

#[macro_use]
mod error;
#[doc(hidden)]
pub use self::error::Result;
pub use self::error::{Error, ErrorKind};

pub mod utils;

pub mod data_types;
