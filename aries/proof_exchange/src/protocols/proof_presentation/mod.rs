pub mod exchange_record;
pub mod prover;
pub mod state;
pub mod verification_status;
pub mod verifier;
