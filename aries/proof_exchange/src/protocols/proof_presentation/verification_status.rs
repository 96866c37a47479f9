/// Verifier's view of the presentation held by an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PresentationVerificationStatus {
    Valid,
    Invalid,
    #[default]
    Unavailable,
}

impl From<Option<bool>> for PresentationVerificationStatus {
    fn from(verified: Option<bool>) -> Self {
        match verified {
            Some(true) => Self::Valid,
            Some(false) => Self::Invalid,
            None => Self::Unavailable,
        }
    }
}
