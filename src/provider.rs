use crate::codec::CodecError;
use crate::{GenesisInfos, OutputReference, ProtocolParameters, Transaction, Utxo};

// The queries and commands a transaction builder needs from a ledger.
// A networked client would answer them asynchronously; the emulator answers them in place.

pub trait GetGenesisInfos {
    fn genesis_infos(&self) -> GenesisInfos;
}

pub trait GetProtocolParameters {
    fn protocol_parameters(&self) -> ProtocolParameters;
}

pub trait ResolveUtxos {
    /// Resolves the references that are currently unspent. Others are left out.
    fn resolve_utxos(&self, references: &[OutputReference]) -> Vec<Utxo>;
}

pub trait SubmitTx {
    /// Submits the transaction and returns its hash, whether or not it was accepted.
    fn submit_tx(&mut self, transaction: Transaction) -> Result<String, CodecError>;

    /// Decodes and submits a hex wire transaction.
    /// Fails only when the transaction can't be decoded.
    fn submit_tx_wire(&mut self, wire: &str) -> Result<String, CodecError>;
}
