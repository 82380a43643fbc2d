//! Opaque asset references.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle to a binary resource held by the data layer.
///
/// 16 bytes (UUID v4), displayed as URL-safe base64. The token itself
/// carries no content; the bytes are resolved through a separate bounded
/// fetch call.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetToken([u8; 16]);

impl AssetToken {
    /// Mint a fresh token.
    pub fn new() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Create a token from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() == 16 {
            let mut arr = [0u8; 16];
            arr.copy_from_slice(bytes);
            Some(Self(arr))
        } else {
            None
        }
    }

    /// Raw bytes of this token.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl Default for AssetToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", URL_SAFE_NO_PAD.encode(self.0))
    }
}

impl fmt::Debug for AssetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetToken({})", &self.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        let original = AssetToken::new();
        let restored = AssetToken::from_bytes(original.as_bytes()).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn token_base64_display() {
        let token = AssetToken::new();
        assert_eq!(token.to_string().len(), 22); // 16 bytes, no padding
    }

    #[test]
    fn token_from_invalid_length_fails() {
        assert!(AssetToken::from_bytes(&[0u8; 8]).is_none());
        assert!(AssetToken::from_bytes(&[0u8; 32]).is_none());
    }

    #[test]
    fn fresh_tokens_differ() {
        assert_ne!(AssetToken::new(), AssetToken::new());
    }
}
