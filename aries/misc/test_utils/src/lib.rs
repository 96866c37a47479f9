#[macro_use]
extern crate serde_json;

pub mod constants;
pub mod errors;
pub mod logger;
pub mod mockdata;
