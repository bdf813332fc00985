//! The single rotating passcode guarding the board.
//!
//! The chain holds one versioned record: the [`CredentialHash`] of the
//! passcode that may be spent next. Spending it is a compare-and-swap. The
//! presented hash must match the current record, and on success the record
//! moves to the hash of a freshly generated passcode which is handed back
//! sealed under the presented hash. Retired hashes are remembered so that a
//! rotation never lands on one of them and stale presentations can be told
//! apart from garbage.
//!
//! The chain itself is a plain struct; callers serialize access to it (see
//! [`crate::board::Board`]).

mod admission;
mod marker;

use std::collections::HashSet;

pub use admission::{Admission, RejectReason};
pub use marker::Marker;

use crate::crypto::{envelope, CredentialHash, EnvelopeError, Passcode};

#[derive(Debug, thiserror::Error)]
pub enum PasscodeChainError {
    #[error("rotation rejected: {0}")]
    Rejected(#[from] RejectReason),
    #[error("failed to seal next passcode: {0}")]
    Envelope(#[from] EnvelopeError),
}

/// How a rotation was authorized, which decides the key its envelope is
///  sealed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationKind {
    Ordinary,
    Recovery,
}

impl RotationKind {
    pub fn marker(self) -> Marker {
        match self {
            RotationKind::Ordinary => Marker::Ordinary,
            RotationKind::Recovery => Marker::Recovery,
        }
    }

    pub fn from_marker(marker: Marker) -> Option<Self> {
        match marker {
            Marker::Ordinary => Some(RotationKind::Ordinary),
            Marker::Recovery => Some(RotationKind::Recovery),
            Marker::Rejected => None,
        }
    }
}

/// The next passcode, encrypted for whoever just authenticated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationEnvelope {
    pub ciphertext: String,
    pub kind: RotationKind,
}

impl RotationEnvelope {
    pub fn marker(&self) -> Marker {
        self.kind.marker()
    }

    /// The credential whose key material opens this envelope, given the
    ///  credential the caller presented
    pub fn unlock_key(&self, presented: &CredentialHash) -> CredentialHash {
        match self.kind {
            RotationKind::Ordinary => presented.clone(),
            RotationKind::Recovery => CredentialHash::recovery(),
        }
    }

    /// Recover the next passcode, failing if it does not decrypt cleanly
    pub fn open(&self, presented: &CredentialHash) -> Result<Passcode, EnvelopeError> {
        let key = self.unlock_key(presented);
        envelope::open_string(&key, &self.ciphertext).map(Passcode::from)
    }

    /// Recover the next passcode the way the legacy client does, yielding
    ///  garbled text instead of an error
    pub fn open_lossy(&self, presented: &CredentialHash) -> String {
        let key = self.unlock_key(presented);
        envelope::open_lossy(&key, &self.ciphertext)
    }
}

/// Result of a successful rotation
#[derive(Debug, Clone)]
pub struct Rotation {
    pub envelope: RotationEnvelope,
    /// Version of the chain after the rotation
    pub version: u64,
}

#[derive(Debug, Default)]
pub struct PasscodeChain {
    version: u64,
    current: Option<CredentialHash>,
    retired: HashSet<String>,
}

impl PasscodeChain {
    /// A chain whose first passcode hashes to `genesis`. Without one the
    ///  chain is unseeded and only the recovery credential is admitted.
    pub fn new(genesis: Option<CredentialHash>) -> Self {
        Self {
            version: 0,
            current: genesis,
            retired: HashSet::new(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_seeded(&self) -> bool {
        self.current.is_some()
    }

    /// Validate a raw caller supplied hash
    pub fn validate(&self, presented: &str) -> Admission {
        match CredentialHash::parse(presented) {
            Ok(hash) => self.validate_hash(&hash),
            Err(e) => Admission::Rejected(RejectReason::Malformed(e)),
        }
    }

    pub fn validate_hash(&self, presented: &CredentialHash) -> Admission {
        if presented.is_recovery() {
            return Admission::Recovery;
        }
        match &self.current {
            Some(current) if current == presented => Admission::Ordinary,
            Some(_) if self.retired.contains(presented.as_str()) => {
                Admission::Rejected(RejectReason::Stale)
            }
            Some(_) => Admission::Rejected(RejectReason::Unknown),
            None => Admission::Rejected(RejectReason::Unseeded),
        }
    }

    /// Spend `presented` and move to a fresh passcode.
    ///
    /// Fails without touching the chain if `presented` is not admitted, so
    ///  of two callers holding the same hash only the first one rotates.
    pub fn rotate(&mut self, presented: &CredentialHash) -> Result<Rotation, PasscodeChainError> {
        let kind = match self.validate_hash(presented) {
            Admission::Ordinary => RotationKind::Ordinary,
            Admission::Recovery => RotationKind::Recovery,
            Admission::Rejected(reason) => return Err(reason.into()),
        };

        let next = self.fresh_passcode();
        let key = match kind {
            RotationKind::Ordinary => presented.clone(),
            RotationKind::Recovery => CredentialHash::recovery(),
        };
        let ciphertext = envelope::seal(&key, next.as_str().as_bytes())?;

        if let Some(previous) = self.current.replace(next.hash()) {
            self.retired.insert(previous.as_str().to_string());
        }
        self.version += 1;
        tracing::debug!(version = self.version, ?kind, "passcode rotated");

        Ok(Rotation {
            envelope: RotationEnvelope { ciphertext, kind },
            version: self.version,
        })
    }

    fn fresh_passcode(&self) -> Passcode {
        loop {
            let candidate = Passcode::generate();
            let hash = candidate.hash();
            let reused = self.current.as_ref() == Some(&hash)
                || self.retired.contains(hash.as_str())
                || hash.is_recovery();
            if !reused {
                return candidate;
            }
        }
    }
}
