use crate::codec::{self, CodecError};
use crate::{Address, Sha256, Value};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// A double SHA-256 hash of the encoded transaction body.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionHash(Sha256);

impl TransactionHash {
    pub const fn new(hash: Sha256) -> Self {
        Self(hash)
    }

    pub fn as_sha256(&self) -> &Sha256 {
        &self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl Display for TransactionHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ReferenceParseError {
    #[error("output reference `{0}` is missing the `#` separator")]
    MissingSeparator(String),
    #[error("output reference `{input}` has an invalid transaction hash: {reason}")]
    InvalidHash { input: String, reason: String },
    #[error("output reference `{0}` has an invalid output index")]
    InvalidIndex(String),
}

/// Points at a single output of a transaction: the transaction hash and the output's
/// position, the first one being 0.
/// The canonical string form is `<hash hex>#<index>`.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct OutputReference {
    transaction_hash: TransactionHash,
    index: u32,
}

impl OutputReference {
    pub const fn new(transaction_hash: TransactionHash, index: u32) -> Self {
        Self {
            transaction_hash,
            index,
        }
    }

    pub fn transaction_hash(&self) -> &TransactionHash {
        &self.transaction_hash
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Display for OutputReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.transaction_hash, self.index)
    }
}

impl FromStr for OutputReference {
    type Err = ReferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hash, index) = s
            .split_once('#')
            .ok_or_else(|| ReferenceParseError::MissingSeparator(s.to_string()))?;
        let hash = Sha256::from_hex(hash).map_err(|e| ReferenceParseError::InvalidHash {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let index = index
            .parse::<u32>()
            .map_err(|_| ReferenceParseError::InvalidIndex(s.to_string()))?;
        Ok(Self::new(TransactionHash::new(hash), index))
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    address: Address,
    value: Value,
    // Inline datum attached to the output, kept as raw bytes.
    datum: Option<Vec<u8>>,
    // Script made available for reference by other transactions.
    reference_script: Option<Vec<u8>>,
}

impl TransactionOutput {
    pub fn new(address: Address, value: Value) -> Self {
        Self {
            address,
            value,
            datum: None,
            reference_script: None,
        }
    }

    pub fn with_datum(mut self, datum: Vec<u8>) -> Self {
        self.datum = Some(datum);
        self
    }

    pub fn with_reference_script(mut self, script: Vec<u8>) -> Self {
        self.reference_script = Some(script);
        self
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn datum(&self) -> Option<&[u8]> {
        self.datum.as_deref()
    }

    pub fn reference_script(&self) -> Option<&[u8]> {
        self.reference_script.as_deref()
    }
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.value, self.address)
    }
}

/// An unspent transaction output together with the reference that locates it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Utxo {
    reference: OutputReference,
    output: TransactionOutput,
}

impl Utxo {
    pub fn new(reference: OutputReference, output: TransactionOutput) -> Self {
        Self { reference, output }
    }

    pub fn reference(&self) -> &OutputReference {
        &self.reference
    }

    pub fn output(&self) -> &TransactionOutput {
        &self.output
    }

    pub fn address(&self) -> &Address {
        self.output.address()
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.reference, self.output)
    }
}

/// The hashed part of a transaction.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionBody {
    inputs: Vec<OutputReference>,
    outputs: Vec<TransactionOutput>,
    fee: u64,
}

impl TransactionBody {
    pub fn new(inputs: Vec<OutputReference>, outputs: Vec<TransactionOutput>, fee: u64) -> Self {
        Self {
            inputs,
            outputs,
            fee,
        }
    }

    pub fn inputs(&self) -> &Vec<OutputReference> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    // Always equal to the double SHA-256 of the encoded body.
    hash: TransactionHash,
    body: TransactionBody,
}

impl Transaction {
    /// Fails when the body can't be encoded, or when it has more outputs than a `u32` output
    /// index can address.
    pub fn new(body: TransactionBody) -> Result<Self, CodecError> {
        check_output_count(body.outputs.len())?;
        let encoded = codec::encode_body(&body)?;
        Ok(Self {
            hash: TransactionHash::new(Sha256::double_digest(&encoded)),
            body,
        })
    }

    pub fn hash(&self) -> &TransactionHash {
        &self.hash
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn inputs(&self) -> &Vec<OutputReference> {
        self.body.inputs()
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        self.body.outputs()
    }

    pub fn fee(&self) -> u64 {
        self.body.fee()
    }

    /// References to the outputs this transaction creates, in output order.
    pub fn output_references(&self) -> impl Iterator<Item = OutputReference> + '_ {
        // `new` guarantees every output has an index in range.
        (0..=u32::MAX)
            .take(self.body.outputs.len())
            .map(move |index| OutputReference::new(self.hash, index))
    }

    /// The outputs this transaction creates, each paired with its new reference.
    pub fn produced_utxos(&self) -> Vec<Utxo> {
        self.output_references()
            .zip(self.body.outputs.iter())
            .map(|(reference, output)| Utxo::new(reference, output.clone()))
            .collect()
    }
}

fn check_output_count(count: usize) -> Result<(), CodecError> {
    match u32::try_from(count) {
        Ok(_) => Ok(()),
        Err(_) => Err(CodecError::TooManyOutputs { count }),
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} inputs, {} outputs, fee {})",
            self.hash,
            self.body.inputs.len(),
            self.body.outputs.len(),
            self.body.fee
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(seed: u8, index: u32) -> OutputReference {
        OutputReference::new(TransactionHash::new(Sha256::from_raw([seed; 32])), index)
    }

    #[test]
    fn reference_string_form() {
        let reference = reference(0xab, 3);
        let text = reference.to_string();
        assert_eq!(text, format!("{}#3", "ab".repeat(32)));
        assert_eq!(text.parse::<OutputReference>(), Ok(reference));
    }

    #[test]
    fn reference_parse_errors() {
        assert_eq!(
            "invalidRef".parse::<OutputReference>(),
            Err(ReferenceParseError::MissingSeparator("invalidRef".to_string()))
        );
        assert!(matches!(
            "invalidRef#1".parse::<OutputReference>(),
            Err(ReferenceParseError::InvalidHash { .. })
        ));
        let bad_index = format!("{}#x", "00".repeat(32));
        assert_eq!(
            bad_index.parse::<OutputReference>(),
            Err(ReferenceParseError::InvalidIndex(bad_index.clone()))
        );
    }

    #[test]
    fn hash_depends_on_body() {
        let output = TransactionOutput::new(Address::from("addr"), Value::lovelaces(5));
        let first =
            Transaction::new(TransactionBody::new(vec![reference(1, 0)], vec![output.clone()], 1))
                .unwrap();
        let second =
            Transaction::new(TransactionBody::new(vec![reference(1, 0)], vec![output], 2)).unwrap();
        assert_ne!(first.hash(), second.hash());
    }

    #[test]
    fn produced_utxos_are_keyed_by_hash_and_index() {
        let outputs = vec![
            TransactionOutput::new(Address::from("a"), Value::lovelaces(1)),
            TransactionOutput::new(Address::from("b"), Value::lovelaces(2)),
        ];
        let transaction =
            Transaction::new(TransactionBody::new(vec![reference(7, 0)], outputs, 0)).unwrap();
        let produced = transaction.produced_utxos();
        assert_eq!(produced.len(), 2);
        for (index, utxo) in produced.iter().enumerate() {
            assert_eq!(utxo.reference().transaction_hash(), transaction.hash());
            assert_eq!(utxo.reference().index(), index as u32);
        }
        assert_eq!(produced[1].address(), &Address::from("b"));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn output_count_must_fit_an_output_index() {
        assert!(check_output_count(u32::MAX as usize).is_ok());
        assert!(matches!(
            check_output_count(u32::MAX as usize + 1),
            Err(CodecError::TooManyOutputs { .. })
        ));
    }
}
