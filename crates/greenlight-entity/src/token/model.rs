//! Token models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::scope::TokenScope;

/// A freshly issued token. This is the only value that ever holds the
/// plaintext, and it is returned to the caller exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    /// Base32 plaintext handed to the client.
    #[serde(rename = "token")]
    pub plaintext: String,
    /// SHA-256 digest of the plaintext.
    #[serde(skip)]
    pub hash: [u8; 32],
    /// Owning user.
    #[serde(skip)]
    pub user_id: i64,
    /// When the token stops being accepted.
    pub expiry: DateTime<Utc>,
    /// What the token may be used for.
    #[serde(skip)]
    pub scope: TokenScope,
}

impl Token {
    /// Returns the persisted form, which carries no plaintext.
    pub fn record(&self) -> TokenRecord {
        TokenRecord {
            hash: self.hash,
            user_id: self.user_id,
            expiry: self.expiry,
            scope: self.scope,
        }
    }
}

/// A token as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// SHA-256 digest of the plaintext.
    pub hash: [u8; 32],
    /// Owning user.
    pub user_id: i64,
    /// When the token stops being accepted.
    pub expiry: DateTime<Utc>,
    /// What the token may be used for.
    pub scope: TokenScope,
}

impl TokenRecord {
    /// Whether the token is still accepted at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_token_hides_internals() {
        let token = Token {
            plaintext: "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
            hash: [7u8; 32],
            user_id: 42,
            expiry: Utc::now(),
            scope: TokenScope::Authentication,
        };
        let json = serde_json::to_value(&token).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("token"));
        assert!(obj.contains_key("expiry"));
    }

    #[test]
    fn test_record_liveness() {
        let now = Utc::now();
        let record = TokenRecord {
            hash: [0u8; 32],
            user_id: 1,
            expiry: now,
            scope: TokenScope::Activation,
        };
        assert!(!record.is_live(now));
        assert!(record.is_live(now - chrono::Duration::seconds(1)));
    }
}
