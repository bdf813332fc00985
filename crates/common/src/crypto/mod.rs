//! Cryptographic primitives for the rotating passcode protocol
//!
//! - **Credentials**: a passcode is never sent over the wire; callers send
//!   its SHA-256 hex digest (`CredentialHash`) instead.
//! - **Passcodes**: the server generates each next passcode at random and
//!   keeps only its hash.
//! - **Envelopes**: the next passcode is returned AES-256-CBC encrypted under
//!   key material sliced out of the credential hash the caller just proved,
//!   so knowledge of the old passcode is enough to read the new one.
//!
//! No key exchange happens here. The scheme assumes the transport is
//! otherwise trusted.

mod credential;
pub mod envelope;
mod passcode;

pub use credential::{
    CredentialError, CredentialHash, CREDENTIAL_HEX_LEN, KEY_OFFSET, KEY_SIZE,
    RECOVERY_PASSPHRASE,
};
pub use envelope::EnvelopeError;
pub use passcode::{Passcode, PASSCODE_LEN};
