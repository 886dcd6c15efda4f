use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const TESTNET_PREFIX: &str = "addr_test1";
const CREDENTIAL_HASH_SIZE: usize = 28;

/// The owner of a transaction output, in its string form.
/// The ledger never inspects the address, it only uses it as an index key.
#[derive(Debug, Clone, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Builds a testnet address from a random 28-byte key hash.
    pub fn random_testnet() -> Self {
        let mut key_hash = [0u8; CREDENTIAL_HASH_SIZE];
        rand::thread_rng().fill(&mut key_hash[..]);
        Self(format!("{}{}", TESTNET_PREFIX, hex::encode(key_hash)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_addresses_are_distinct() {
        let first = Address::random_testnet();
        let second = Address::random_testnet();
        assert_ne!(first, second);
        assert!(first.as_str().starts_with(TESTNET_PREFIX));
        assert_eq!(
            first.as_str().len(),
            TESTNET_PREFIX.len() + 2 * CREDENTIAL_HASH_SIZE
        );
    }
}
