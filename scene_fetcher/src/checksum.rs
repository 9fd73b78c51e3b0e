use serde::Deserialize;
use sha2::{Digest, Sha256};

use std::fmt::Formatter;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// A SHA-256 digest of a scene archive, written as 64 hex characters in test lists.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Sha256Hash([u8; 32]);

impl Sha256Hash {
    /// Hash the contents of the file at `path`.
    pub fn of_file(path: &Path) -> std::io::Result<Self> {
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let n = file.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Ok(Sha256Hash(digest))
    }
}

impl<'de> Deserialize<'de> for Sha256Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Sha256Hash::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Sha256Hash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Sha256Hash(bytes))
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
