use crate::crypto::CredentialError;

/// Outcome of checking a credential against the passcode chain.
///
/// ```text
/// Unauthenticated -> AwaitingCredential -> { Ordinary, Recovery, Rejected }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The hash of the current passcode
    Ordinary,
    /// The hash of the public recovery passphrase, admitted regardless of state
    Recovery,
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Admission::Rejected(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("malformed credential: {0}")]
    Malformed(#[from] CredentialError),
    #[error("passcode has already been used")]
    Stale,
    #[error("passcode validation failed")]
    Unknown,
    #[error("the board has no passcode yet, post with the recovery passcode")]
    Unseeded,
    #[error("a passcode is required")]
    MissingCredential,
}

impl RejectReason {
    /// Stable machine readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::Malformed(_) => "malformed_credential",
            RejectReason::Stale => "stale_credential",
            RejectReason::Unknown => "unknown_credential",
            RejectReason::Unseeded => "unseeded",
            RejectReason::MissingCredential => "missing_credential",
        }
    }
}
