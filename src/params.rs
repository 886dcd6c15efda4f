use serde::{Deserialize, Serialize};

/// Describes where the emulated chain starts and how fast its slots go.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenesisInfos {
    // POSIX time of the first slot, in milliseconds.
    pub system_start_ms: u64,
    pub start_slot: u64,
    pub slot_length_ms: u64,
}

impl GenesisInfos {
    pub const fn mainnet() -> Self {
        Self {
            system_start_ms: 1_506_203_091_000,
            start_slot: 4_492_800,
            slot_length_ms: 1_000,
        }
    }

    pub const fn preprod() -> Self {
        Self {
            system_start_ms: 1_655_769_600_000,
            start_slot: 86_400,
            slot_length_ms: 1_000,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.slot_length_ms > 0
    }

    /// Returns these infos if they are usable, otherwise the mainnet preset.
    pub fn or_preset(self) -> Self {
        if self.is_valid() {
            self
        } else {
            tracing::warn!(
                "Invalid genesis infos {:?}, falling back to the mainnet preset.",
                self
            );
            Self::mainnet()
        }
    }
}

impl Default for GenesisInfos {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// The subset of protocol parameters the ledger enforces.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ProtocolParameters {
    pub tx_fee_per_byte: u64,
    pub tx_fee_fixed: u64,
    pub max_tx_size: u64,
    pub max_block_body_size: u64,
}

impl ProtocolParameters {
    /// Values currently in effect on mainnet.
    pub const fn mainnet() -> Self {
        Self {
            tx_fee_per_byte: 44,
            tx_fee_fixed: 155_381,
            max_tx_size: 16_384,
            max_block_body_size: 90_112,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.max_tx_size > 0
            && self.max_block_body_size > 0
            && self.max_tx_size <= self.max_block_body_size
    }

    /// Returns these parameters if they are usable, otherwise the default preset.
    pub fn or_preset(self) -> Self {
        if self.is_valid() {
            self
        } else {
            tracing::warn!(
                "Invalid protocol parameters {:?}, falling back to the default preset.",
                self
            );
            Self::default()
        }
    }

    /// The linear fee rule: a fixed part plus a price per encoded byte.
    pub fn min_fee(&self, tx_size: u64) -> u64 {
        self.tx_fee_fixed
            .saturating_add(self.tx_fee_per_byte.saturating_mul(tx_size))
    }
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            tx_fee_per_byte: 44,
            tx_fee_fixed: 155_381,
            max_tx_size: 16_384,
            max_block_body_size: 65_536,
        }
    }
}
