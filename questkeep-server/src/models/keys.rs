//! Caller-chosen identity keys
//!
//! Wallet addresses and item ids are arbitrary strings supplied by clients
//! and never change after insertion. Input is checked for emptiness and
//! length only; rows already in the store are read back as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for wallet addresses and item ids
const MAX_KEY_LEN: usize = 128;

fn validate_key(field: &'static str, s: &str) -> Result<String, ValidationError> {
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if s.len() > MAX_KEY_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_KEY_LEN,
        });
    }

    Ok(s.to_owned())
}

/// Keys decoded from store columns, which skip input validation.
pub(crate) trait StoredKey {
    fn from_stored(raw: String) -> Self;
}

/// Wallet address identifying a user.
///
/// # Example
/// ```
/// use questkeep_server::models::WalletAddress;
///
/// assert!(WalletAddress::new("0xabc").is_ok());
/// assert!(WalletAddress::new("").is_err());
/// assert!(WalletAddress::new("alice@example.com").is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_key("wallet address", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Item identifier such as `sword_of_truth`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate_key("item id", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

macro_rules! impl_key_traits {
    ($ty:ident) => {
        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ValidationError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(&s)
            }
        }

        impl StoredKey for $ty {
            fn from_stored(raw: String) -> Self {
                Self(raw)
            }
        }

        impl From<$ty> for String {
            fn from(key: $ty) -> Self {
                key.0
            }
        }
    };
}

impl_key_traits!(WalletAddress);
impl_key_traits!(ItemId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_keys() {
        assert!(WalletAddress::new("0x1234567890abcdef1234567890abcdef12345678").is_ok());
        assert!(WalletAddress::new("vitalik.eth").is_ok());
        assert!(ItemId::new("sword_of_truth").is_ok());
        assert!(ItemId::new("potion:small-3").is_ok());
    }

    #[test]
    fn rejects_empty() {
        let err = WalletAddress::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "wallet address" }));
    }

    #[test]
    fn accepts_free_form_strings() {
        assert!(WalletAddress::new("john doe").is_ok());
        assert!(WalletAddress::new("alice@example.com").is_ok());
        assert!(ItemId::new("sword of truth").is_ok());
        assert!(ItemId::new("-potion/small").is_ok());
    }

    #[test]
    fn stored_keys_skip_validation() {
        let long = "w".repeat(300);
        assert_eq!(WalletAddress::from_stored(long.clone()).as_str(), long);
        assert_eq!(ItemId::from_stored(String::new()).as_str(), "");
    }

    #[test]
    fn max_length() {
        assert!(ItemId::new(&"a".repeat(128)).is_ok());

        let err = ItemId::new(&"a".repeat(129)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 128, .. }));
    }

    #[test]
    fn deserializes_with_validation() {
        let ok: WalletAddress = serde_json::from_str("\"0xabc\"").unwrap();
        assert_eq!(ok.as_str(), "0xabc");

        let bad: Result<WalletAddress, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
