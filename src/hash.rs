use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

const SHA256_BYTE_COUNT: usize = 32;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum HashParseError {
    #[error("invalid hex in hash `{input}`: {reason}")]
    InvalidHex { input: String, reason: String },
    #[error("invalid SHA-256 length. Expected: 32 but got: {actual} in: {input}")]
    InvalidLength { input: String, actual: usize },
}

/// Sha-256 is a 256-bit array or 32 bytes.
/// Displays as a lowercase hex string and parses back from one.
#[derive(Copy, Clone, Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sha256([u8; SHA256_BYTE_COUNT]);

impl Sha256 {
    pub const fn from_raw(raw_bytes: [u8; SHA256_BYTE_COUNT]) -> Self {
        Self(raw_bytes)
    }

    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(data);
        let mut output = [0; SHA256_BYTE_COUNT];
        output.copy_from_slice(hasher.finalize().as_slice());
        Sha256::from_raw(output)
    }

    /// Hashes the data twice, the way transaction ids are derived.
    pub fn double_digest(data: &[u8]) -> Self {
        let first = Self::digest(data);
        Self::digest(first.as_slice())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_slice())
    }

    pub fn from_hex(s: &str) -> Result<Self, HashParseError> {
        let bytes = hex::decode(s).map_err(|e| HashParseError::InvalidHex {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        if bytes.len() != SHA256_BYTE_COUNT {
            return Err(HashParseError::InvalidLength {
                input: s.to_string(),
                actual: bytes.len(),
            });
        }
        let mut sha = [0; SHA256_BYTE_COUNT];
        sha.copy_from_slice(&bytes);
        Ok(Sha256::from_raw(sha))
    }
}

impl Display for Sha256 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Sha256 {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
