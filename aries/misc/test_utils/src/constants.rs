pub const SCHEMA_ID: &str = "V4SGRU86Z58d6TV7PBUe6f:2:gvt:1.0";
pub const CRED_DEF_ID: &str = "V4SGRU86Z58d6TV7PBUe6f:3:CL:V4SGRU86Z58d6TV7PBUe6f:2:gvt:1.0:tag";
pub const REV_CRED_DEF_ID: &str =
    "V4SGRU86Z58d6TV7PBUe6f:3:CL:V4SGRU86Z58d6TV7PBUe6f:2:gvt:1.0:revocable";
pub const REV_REG_ID: &str = "V4SGRU86Z58d6TV7PBUe6f:4:V4SGRU86Z58d6TV7PBUe6f:3:CL:\
                              V4SGRU86Z58d6TV7PBUe6f:2:gvt:1.0:revocable:CL_ACCUM:tag1";
pub const TAILS_HASH: &str = "D2fjVc9XL1fpRE7GDMUvQJ1ZafY3cRrgcxPuRNEGADBP";
pub const ISSUER_DID: &str = "V4SGRU86Z58d6TV7PBUe6f";

/// Ledger time the revocation registry definition was written.
pub const REV_REG_TXN_TIME: u64 = 1_600_000_000;
/// Ledger time of the latest accumulator update.
pub const REV_REG_DELTA_TIMESTAMP: u64 = 1_650_000_000;
/// Reference "now" used by fixtures that need a stable clock.
pub const FIXTURE_NOW: u64 = 1_700_000_000;
