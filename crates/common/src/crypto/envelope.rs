//! AES-256-CBC sealing of passcodes under a credential hash.
//!
//! The recipe is fixed so the browser client can reproduce it with
//! CryptoJS: key = UTF-8 bytes of `hash[28..60]`, IV = UTF-8 bytes of
//! [`IV`], PKCS#7 padding, ciphertext hex encoded.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::CredentialHash;

/// Shared by client and server
pub const IV: &[u8; 16] = b"snooping6is9bad0";

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("ciphertext is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("invalid key or iv length")]
    InvalidLength,
    #[error("ciphertext failed to unpad, wrong key or corrupted data")]
    Unpad,
    #[error("decrypted passcode is not valid utf-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

/// Encrypt `plaintext` under the key derived from `credential`, returning hex
pub fn seal(credential: &CredentialHash, plaintext: &[u8]) -> Result<String, EnvelopeError> {
    let key = credential.key_material();
    let cipher =
        Aes256CbcEnc::new_from_slices(&key, IV).map_err(|_| EnvelopeError::InvalidLength)?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    Ok(hex::encode(ciphertext))
}

/// Decrypt hex `ciphertext` under the key derived from `credential`
pub fn open(credential: &CredentialHash, ciphertext: &str) -> Result<Vec<u8>, EnvelopeError> {
    let bytes = hex::decode(ciphertext)?;
    let key = credential.key_material();
    let cipher =
        Aes256CbcDec::new_from_slices(&key, IV).map_err(|_| EnvelopeError::InvalidLength)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
        .map_err(|_| EnvelopeError::Unpad)
}

/// Decrypt to a utf-8 string, failing on anything that does not decode
pub fn open_string(credential: &CredentialHash, ciphertext: &str) -> Result<String, EnvelopeError> {
    Ok(String::from_utf8(open(credential, ciphertext)?)?)
}

/// Legacy permissive decryption.
///
/// Mirrors what the browser client does: whatever comes out is rendered as
/// text, with undecodable input collapsing to an empty or garbled string
/// rather than an error.
pub fn open_lossy(credential: &CredentialHash, ciphertext: &str) -> String {
    match open(credential, ciphertext) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::debug!("lossy envelope open failed: {}", e);
            String::new()
        }
    }
}
