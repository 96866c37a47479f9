pub mod common;
pub mod proof_presentation;
