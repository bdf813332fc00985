use std::fmt;

use rand::distr::Alphanumeric;
use rand::Rng;

use super::CredentialHash;

/// Number of characters in a generated passcode
pub const PASSCODE_LEN: usize = 12;

/// A raw passcode. Only ever held by the caller who was just handed it;
///  the server keeps nothing but its [`CredentialHash`].
#[derive(Clone, PartialEq, Eq)]
pub struct Passcode(String);

impl Passcode {
    /// Generate a fresh random alphanumeric passcode
    pub fn generate() -> Self {
        let code: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(PASSCODE_LEN)
            .map(char::from)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hash(&self) -> CredentialHash {
        CredentialHash::from_passcode(&self.0)
    }
}

impl From<String> for Passcode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Passcode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passcode(<redacted>)")
    }
}

impl fmt::Display for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let passcode = Passcode::generate();
        assert_eq!(passcode.as_str().len(), PASSCODE_LEN);
        assert!(passcode.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_is_random() {
        assert_ne!(Passcode::generate(), Passcode::generate());
    }

    #[test]
    fn test_debug_is_redacted() {
        let passcode = Passcode::from("abc123");
        assert!(!format!("{:?}", passcode).contains("abc123"));
    }
}
