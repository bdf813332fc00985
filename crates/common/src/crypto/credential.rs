use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of a hex encoded SHA-256 digest
pub const CREDENTIAL_HEX_LEN: usize = 64;
/// Offset into the hex digest where the symmetric key material begins
pub const KEY_OFFSET: usize = 28;
/// Size of the AES-256 key taken from the hex digest, in bytes
pub const KEY_SIZE: usize = 32;
/// Publicly known passphrase whose hash is always admitted.
///
/// This is a deliberate low-assurance backdoor: anyone who knows the
/// passphrase can post without holding the rotating passcode. It also seeds
/// an empty board.
pub const RECOVERY_PASSPHRASE: &str = "gen6si9";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("credential hash must be {CREDENTIAL_HEX_LEN} characters, got {0}")]
    InvalidLength(usize),
    #[error("credential hash must be lowercase hex")]
    InvalidHex,
}

/// The lowercase hex SHA-256 digest of a passcode.
///
/// Callers prove knowledge of a passcode by presenting this hash. The same
/// string doubles as key material: characters `[28, 60)` are the AES key
/// used to deliver the next passcode back to whoever presented it.
#[derive(Clone)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Hash a raw passcode
    pub fn from_passcode(passcode: &str) -> Self {
        let digest = Sha256::digest(passcode.as_bytes());
        Self(hex::encode(digest))
    }

    /// Parse a caller supplied hash, rejecting anything that is not
    ///  exactly 64 lowercase hex characters
    pub fn parse(value: &str) -> Result<Self, CredentialError> {
        if value.len() != CREDENTIAL_HEX_LEN {
            return Err(CredentialError::InvalidLength(value.len()));
        }
        let well_formed = value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(CredentialError::InvalidHex);
        }
        Ok(Self(value.to_string()))
    }

    /// The hash of [`RECOVERY_PASSPHRASE`]
    pub fn recovery() -> Self {
        Self::from_passcode(RECOVERY_PASSPHRASE)
    }

    pub fn is_recovery(&self) -> bool {
        *self == Self::recovery()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key bytes for AES-256: the UTF-8 bytes of `hash[28..60]`
    pub fn key_material(&self) -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&self.0.as_bytes()[KEY_OFFSET..KEY_OFFSET + KEY_SIZE]);
        key
    }

    /// A short prefix, safe to put in logs
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl PartialEq for CredentialHash {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for CredentialHash {}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialHash({}..)", self.short())
    }
}

impl fmt::Display for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for CredentialHash {
    type Error = CredentialError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
