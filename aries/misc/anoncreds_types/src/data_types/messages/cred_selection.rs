use super::super::{credential::CredentialInfo, pres_request::NonRevokedInterval};

/// A wallet credential suitable for one referent (`cred_info`), together with the
/// non-revocation `interval` the request asked for on that referent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RetrievedCredentialForReferent {
    pub cred_info: CredentialInfo,
    pub interval: Option<NonRevokedInterval>,
}
