use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 digest of a course file's bytes, used to skip re-indexing
/// materials that have not changed between runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn parse(hash: String) -> Result<Self, String> {
        if hash.len() != 64 {
            return Err("Hash must be 64 characters long (SHA-256)".to_string());
        }

        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("Hash must contain only hexadecimal characters".to_string());
        }

        Ok(Self(hash.to_lowercase()))
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_is_stable() {
        let a = ContentHash::from_bytes(b"cours de nlp");
        let b = ContentHash::from_bytes(b"cours de nlp");
        let c = ContentHash::from_bytes(b"autre support");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(ContentHash::parse("short".to_string()).is_err());
        assert!(
            ContentHash::parse(
                "z".repeat(64)
            )
            .is_err()
        );
    }

    #[test]
    fn test_parse_normalizes_case() {
        let digest = ContentHash::from_bytes(b"x").as_str().to_uppercase();
        let parsed = ContentHash::parse(digest.clone()).unwrap();
        assert_eq!(parsed.as_str(), digest.to_lowercase());
    }
}
