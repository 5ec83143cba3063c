use serde::{Deserialize, Deserializer};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Credential string (API keys, session tokens, passphrases) zeroized on drop
#[derive(Clone, Default, ZeroizeOnDrop)]
pub struct SecureString {
    data: String,
}

impl SecureString {
    pub fn new(data: String) -> Self {
        Self { data }
    }

    /// Borrow the secret; keep the borrow short and never log it
    pub fn expose(&self) -> &str {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Constant-time comparison
    pub fn secure_eq(&self, other: &SecureString) -> bool {
        self.data.as_bytes().ct_eq(other.data.as_bytes()).into()
    }

    pub fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("data", &"[REDACTED]")
            .field("len", &self.data.len())
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED SecureString of {} bytes]", self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_expose() {
        let s = SecureString::from("privy-api-key");
        assert_eq!(s.len(), 13);
        assert!(!s.is_empty());
        assert_eq!(s.expose(), "privy-api-key");
    }

    #[test]
    fn test_secure_string_eq() {
        let s1 = SecureString::from("password123");
        let s2 = SecureString::from("password123");
        let s3 = SecureString::from("different");

        assert!(s1.secure_eq(&s2));
        assert!(!s1.secure_eq(&s3));
    }

    #[test]
    fn test_secure_string_formatting_is_redacted() {
        let s = SecureString::from("secret");
        assert!(format!("{:?}", s).contains("[REDACTED]"));
        assert!(!format!("{:?}", s).contains("secret"));
        assert!(!format!("{}", s).contains("secret"));
    }

    #[test]
    fn test_secure_string_deserialize() {
        let s: SecureString = serde_json::from_str("\"token\"").unwrap();
        assert_eq!(s.expose(), "token");
    }

    #[test]
    fn test_zeroize() {
        let mut s = SecureString::from("secret");
        s.zeroize();
        assert!(s.is_empty());
    }
}
