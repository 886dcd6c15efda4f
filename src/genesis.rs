//! Helpers to seed an emulator with initial outputs.

use crate::{
    Address, OutputReference, Sha256, TransactionHash, TransactionOutput, Utxo, Value,
};

/// 100 ADA.
pub const DEFAULT_INITIAL_AMOUNT: u64 = 100_000_000;

/// Derives a transaction hash from an index, without hashing.
/// The first byte is the index, and byte `i` is `(index * i + i * i) mod 256`, so different
/// indices below 256 give different hashes.
pub fn generate_tx_hash(index: u64) -> TransactionHash {
    let mut bytes = [0u8; 32];
    bytes[0] = (index % 256) as u8;
    for (i, byte) in bytes.iter_mut().enumerate().skip(1) {
        let i = i as u64;
        *byte = (index.wrapping_mul(i).wrapping_add(i * i) % 256) as u8;
    }
    TransactionHash::new(Sha256::from_raw(bytes))
}

/// Creates a coin-only output at index 0 of the given transaction, without datum or script.
pub fn initial_utxo(lovelaces: u64, address: Address, tx_hash: TransactionHash) -> Utxo {
    Utxo::new(
        OutputReference::new(tx_hash, 0),
        TransactionOutput::new(address, Value::lovelaces(lovelaces)),
    )
}

/// Creates `count` outputs of `amount` lovelaces, each at its own random testnet address.
pub fn random_initial_utxos(count: usize, amount: u64) -> Vec<Utxo> {
    (0..count as u64)
        .map(|index| initial_utxo(amount, Address::random_testnet(), generate_tx_hash(index)))
        .collect()
}
