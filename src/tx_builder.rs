use crate::codec::{BincodeHexCodec, CodecError, TransactionCodec};
use crate::value::ValueError;
use crate::{
    Address, ProtocolParameters, Transaction, TransactionBody, TransactionOutput, Utxo, Value,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("a transaction needs at least one input")]
    NoInputs,
    #[error("inputs do not cover outputs and fee: {0}")]
    InsufficientFunds(#[source] ValueError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Builds balanced transactions that pay the minimum fee.
///
/// Everything the inputs hold beyond the requested outputs and the fee goes to a change output
/// at the change address, which is appended after the requested outputs.
#[derive(Debug, Clone)]
pub struct TxBuilder<C = BincodeHexCodec> {
    protocol_parameters: ProtocolParameters,
    codec: C,
}

impl TxBuilder<BincodeHexCodec> {
    pub fn new(protocol_parameters: ProtocolParameters) -> Self {
        Self::with_codec(protocol_parameters, BincodeHexCodec)
    }
}

impl<C: TransactionCodec> TxBuilder<C> {
    pub fn with_codec(protocol_parameters: ProtocolParameters, codec: C) -> Self {
        Self {
            protocol_parameters,
            codec,
        }
    }

    pub fn build(
        &self,
        inputs: &[Utxo],
        outputs: Vec<TransactionOutput>,
        change_address: &Address,
    ) -> Result<Transaction, BuildError> {
        if inputs.is_empty() {
            return Err(BuildError::NoInputs);
        }
        let input_value = Value::checked_sum(inputs.iter().map(|utxo| utxo.output().value()))
            .map_err(BuildError::InsufficientFunds)?;
        let output_value = Value::checked_sum(outputs.iter().map(TransactionOutput::value))
            .map_err(BuildError::InsufficientFunds)?;
        let available = input_value
            .checked_sub(&output_value)
            .map_err(BuildError::InsufficientFunds)?;

        // The encoded size does not depend on the amounts, so a draft that sends everything
        // to the change address has the size of the final transaction.
        let draft = self.assemble(inputs, &outputs, change_address, available.clone(), 0)?;
        let fee = self
            .protocol_parameters
            .min_fee(self.codec.encoded_size(&draft)?);
        let change = available
            .checked_sub(&Value::lovelaces(fee))
            .map_err(BuildError::InsufficientFunds)?;
        self.assemble(inputs, &outputs, change_address, change, fee)
    }

    fn assemble(
        &self,
        inputs: &[Utxo],
        outputs: &[TransactionOutput],
        change_address: &Address,
        change: Value,
        fee: u64,
    ) -> Result<Transaction, BuildError> {
        let mut outputs = outputs.to_vec();
        if change != Value::zero() {
            outputs.push(TransactionOutput::new(change_address.clone(), change));
        }
        let inputs = inputs.iter().map(|utxo| *utxo.reference()).collect();
        Ok(Transaction::new(TransactionBody::new(inputs, outputs, fee))?)
    }
}
