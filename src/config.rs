use crate::{GenesisInfos, ProtocolParameters, Utxo};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the settlement engine does with a transaction at the head of the pool that does not
/// fit into the current block.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Leave it at the head of the pool and close the block.
    Defer,
    /// Discard it when it is larger than an empty block, otherwise defer it.
    Drop,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        OverflowPolicy::Defer
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid emulator configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything needed to build an emulator.
/// Missing fields take their defaults; invalid genesis or protocol sections are replaced by
/// presets when the emulator is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    pub initial_utxos: Vec<Utxo>,
    pub genesis_infos: GenesisInfos,
    pub protocol_parameters: ProtocolParameters,
    // Only changes how much detail is logged.
    pub debug_level: u8,
    pub overflow_policy: OverflowPolicy,
    pub validate_transactions: bool,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            initial_utxos: vec![],
            genesis_infos: GenesisInfos::default(),
            protocol_parameters: ProtocolParameters::default(),
            debug_level: 1,
            overflow_policy: OverflowPolicy::default(),
            validate_transactions: true,
        }
    }
}

impl EmulatorConfig {
    pub fn with_initial_utxos(initial_utxos: Vec<Utxo>) -> Self {
        Self {
            initial_utxos,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replaces invalid sections with their presets.
    pub(crate) fn normalized(mut self) -> Self {
        self.genesis_infos = self.genesis_infos.or_preset();
        self.protocol_parameters = self.protocol_parameters.or_preset();
        self
    }
}
