pub mod anoncreds;
pub mod errors;

pub use anoncreds_types;
