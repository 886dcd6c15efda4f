use crate::{Transaction, TransactionBody};
use bincode::Options;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("transaction is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("transaction body could not be encoded or decoded: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("transaction has {count} outputs, more than an output index can address")]
    TooManyOutputs { count: usize },
}

/// Converts transactions to and from their wire format.
/// The ledger only needs the decoded form and the encoded size.
pub trait TransactionCodec {
    /// Encodes the transaction into bytes.
    fn encode(&self, transaction: &Transaction) -> Result<Vec<u8>, CodecError>;

    /// Returns the size of the encoded transaction.
    fn encoded_size(&self, transaction: &Transaction) -> Result<u64, CodecError>;

    /// Decodes a transaction from its hex wire form.
    fn decode_wire(&self, wire: &str) -> Result<Transaction, CodecError>;

    /// Encodes the transaction into its hex wire form.
    fn encode_wire(&self, transaction: &Transaction) -> Result<String, CodecError> {
        self.encode(transaction).map(hex::encode)
    }
}

/// Wire format: the bincode encoding of the transaction body, hex-encoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeHexCodec;

impl TransactionCodec for BincodeHexCodec {
    fn encode(&self, transaction: &Transaction) -> Result<Vec<u8>, CodecError> {
        encode_body(transaction.body())
    }

    fn encoded_size(&self, transaction: &Transaction) -> Result<u64, CodecError> {
        Ok(bincode::serialized_size(transaction.body())?)
    }

    fn decode_wire(&self, wire: &str) -> Result<Transaction, CodecError> {
        let bytes = hex::decode(wire.trim())?;
        // Same layout as `bincode::serialize`, but a body must fill the whole wire.
        let body = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .reject_trailing_bytes()
            .deserialize::<TransactionBody>(&bytes)?;
        Transaction::new(body)
    }
}

pub(crate) fn encode_body(body: &TransactionBody) -> Result<Vec<u8>, CodecError> {
    Ok(bincode::serialize(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, OutputReference, Sha256, TransactionHash, TransactionOutput, Value};

    fn transaction() -> Transaction {
        let input = OutputReference::new(TransactionHash::new(Sha256::from_raw([3; 32])), 0);
        let output = TransactionOutput::new(Address::from("addr_test1xyz"), Value::lovelaces(42))
            .with_datum(vec![1, 2, 3]);
        Transaction::new(TransactionBody::new(vec![input], vec![output], 170_000)).unwrap()
    }

    #[test]
    fn wire_decoding_keeps_the_hash() {
        let codec = BincodeHexCodec;
        let transaction = transaction();
        let wire = codec.encode_wire(&transaction).unwrap();
        let decoded = codec.decode_wire(&wire).unwrap();
        assert_eq!(decoded.hash(), transaction.hash());
        assert_eq!(decoded, transaction);
    }

    #[test]
    fn encoded_size_matches_encoding() {
        let codec = BincodeHexCodec;
        let transaction = transaction();
        assert_eq!(
            codec.encoded_size(&transaction).unwrap(),
            codec.encode(&transaction).unwrap().len() as u64
        );
    }

    #[test]
    fn fee_does_not_change_the_size() {
        let codec = BincodeHexCodec;
        let body = transaction().body().clone();
        let cheap = Transaction::new(TransactionBody::new(
            body.inputs().clone(),
            body.outputs().clone(),
            0,
        ))
        .unwrap();
        assert_eq!(
            codec.encoded_size(&cheap).unwrap(),
            codec.encoded_size(&transaction()).unwrap()
        );
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            BincodeHexCodec.decode_wire("mockCborString"),
            Err(CodecError::Hex(_))
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let wire = BincodeHexCodec.encode_wire(&transaction()).unwrap();
        assert!(matches!(
            BincodeHexCodec.decode_wire(&format!("{}00", wire)),
            Err(CodecError::Bincode(_))
        ));
    }

    #[test]
    fn rejects_truncated_body() {
        let wire = BincodeHexCodec.encode_wire(&transaction()).unwrap();
        assert!(matches!(
            BincodeHexCodec.decode_wire(&wire[..20]),
            Err(CodecError::Bincode(_))
        ));
    }
}
