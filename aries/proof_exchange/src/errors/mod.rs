pub mod error;
mod mapping_anoncreds;
mod mapping_ledger;
mod mapping_others;
