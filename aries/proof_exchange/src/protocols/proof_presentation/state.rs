use strum_macros::{AsRefStr, Display, EnumString};

/// Side of the exchange a record is kept for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Prover,
    Verifier,
}

/// Whether the exchange was opened by this agent or by its peer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
pub enum Initiator {
    #[serde(rename = "self")]
    #[strum(serialize = "self")]
    SelfInitiated,
    #[serde(rename = "external")]
    #[strum(serialize = "external")]
    External,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExchangeState {
    ProposalSent,
    ProposalReceived,
    RequestSent,
    RequestReceived,
    PresentationSent,
    PresentationReceived,
    Verified,
    PresentationAcked,
    Abandoned,
}

impl ExchangeState {
    /// Role whose records may be in this state. `Abandoned` is shared.
    pub fn role(self) -> Option<Role> {
        match self {
            Self::ProposalSent
            | Self::RequestReceived
            | Self::PresentationSent
            | Self::PresentationAcked => Some(Role::Prover),
            Self::ProposalReceived
            | Self::RequestSent
            | Self::PresentationReceived
            | Self::Verified => Some(Role::Verifier),
            Self::Abandoned => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Verified | Self::PresentationAcked | Self::Abandoned
        )
    }

    /// States a new record of `role` can be created in.
    pub fn is_initial(self, role: Role) -> bool {
        matches!(
            (role, self),
            (Role::Prover, Self::ProposalSent | Self::RequestReceived)
                | (Role::Verifier, Self::ProposalReceived | Self::RequestSent)
        )
    }

    /// Whether a record of `role` may move from `self` to `next`.
    pub fn can_transition(self, role: Role, next: ExchangeState) -> bool {
        use ExchangeState::*;

        if self.role() != Some(role) {
            return false;
        }
        match (role, self, next) {
            (_, current, Abandoned) => !current.is_terminal(),
            (Role::Prover, ProposalSent, RequestReceived)
            | (Role::Prover, RequestReceived, ProposalSent | PresentationSent)
            | (Role::Prover, PresentationSent, PresentationAcked)
            | (Role::Verifier, ProposalReceived, RequestSent)
            | (Role::Verifier, RequestSent, ProposalReceived | PresentationReceived)
            | (Role::Verifier, PresentationReceived, Verified) => true,
            _ => false,
        }
    }
}
