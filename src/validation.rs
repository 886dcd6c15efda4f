use crate::{OutputReference, ProtocolParameters, Transaction, UtxoSet};
use std::collections::HashSet;
use thiserror::Error;

/// The reason a transaction was not admitted to the pool.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Rejection {
    #[error("no inputs")]
    NoInputs,
    #[error("no outputs")]
    NoOutputs,
    #[error("duplicate input {0}")]
    DuplicateInput(OutputReference),
    #[error("already spent input {0}")]
    AlreadySpent(OutputReference),
    #[error("unknown input {0}")]
    UnknownInput(OutputReference),
    #[error("size exceeds maximum: {size} > {max_size} bytes")]
    SizeExceedsMaximum { size: u64, max_size: u64 },
    #[error("insufficient fee: declared {declared}, minimum {minimum}")]
    InsufficientFee { declared: u64, minimum: u64 },
}

// Decides whether a submitted transaction may enter the pool.
// Note that this is a non-exhaustive list of checks: witnesses, scripts and value balance are
// not verified.
#[derive(Debug, Clone)]
pub struct AdmissionValidator {
    protocol_parameters: ProtocolParameters,
}

impl AdmissionValidator {
    pub fn new(protocol_parameters: ProtocolParameters) -> Self {
        Self {
            protocol_parameters,
        }
    }

    /// Runs all checks in order and returns the first failure.
    /// `tx_size` is the size of the encoded transaction.
    pub fn validate(
        &self,
        transaction: &Transaction,
        tx_size: u64,
        utxos: &UtxoSet,
    ) -> Result<(), Rejection> {
        Self::validate_has_inputs(transaction)?;
        Self::validate_has_outputs(transaction)?;
        Self::validate_inputs_are_distinct(transaction)?;
        Self::validate_inputs_are_unspent(transaction, utxos)?;
        self.validate_size(tx_size)?;
        self.validate_fee(transaction, tx_size)
    }

    pub fn is_valid(&self, transaction: &Transaction, tx_size: u64, utxos: &UtxoSet) -> bool {
        self.validate(transaction, tx_size, utxos).is_ok()
    }

    fn validate_has_inputs(transaction: &Transaction) -> Result<(), Rejection> {
        if transaction.inputs().is_empty() {
            Err(Rejection::NoInputs)
        } else {
            Ok(())
        }
    }

    fn validate_has_outputs(transaction: &Transaction) -> Result<(), Rejection> {
        if transaction.outputs().is_empty() {
            Err(Rejection::NoOutputs)
        } else {
            Ok(())
        }
    }

    fn validate_inputs_are_distinct(transaction: &Transaction) -> Result<(), Rejection> {
        let mut seen = HashSet::new();
        match transaction
            .inputs()
            .iter()
            .find(|input| !seen.insert(**input))
        {
            Some(duplicate) => Err(Rejection::DuplicateInput(*duplicate)),
            None => Ok(()),
        }
    }

    fn validate_inputs_are_unspent(
        transaction: &Transaction,
        utxos: &UtxoSet,
    ) -> Result<(), Rejection> {
        match transaction
            .inputs()
            .iter()
            .find(|input| !utxos.contains(input))
        {
            Some(missing) if utxos.is_spent(missing) => Err(Rejection::AlreadySpent(*missing)),
            Some(missing) => Err(Rejection::UnknownInput(*missing)),
            None => Ok(()),
        }
    }

    fn validate_size(&self, tx_size: u64) -> Result<(), Rejection> {
        let max_size = self.protocol_parameters.max_tx_size;
        if tx_size > max_size {
            Err(Rejection::SizeExceedsMaximum {
                size: tx_size,
                max_size,
            })
        } else {
            Ok(())
        }
    }

    fn validate_fee(&self, transaction: &Transaction, tx_size: u64) -> Result<(), Rejection> {
        let minimum = self.protocol_parameters.min_fee(tx_size);
        if transaction.fee() < minimum {
            Err(Rejection::InsufficientFee {
                declared: transaction.fee(),
                minimum,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Address, Sha256, TransactionBody, TransactionHash, TransactionOutput, Utxo, Value,
    };

    const SIZE: u64 = 300;

    fn reference(seed: u8) -> OutputReference {
        OutputReference::new(TransactionHash::new(Sha256::from_raw([seed; 32])), 0)
    }

    fn output() -> TransactionOutput {
        TransactionOutput::new(Address::from("alice"), Value::lovelaces(1_000_000))
    }

    fn utxos() -> UtxoSet {
        UtxoSet::from_utxos(vec![
            Utxo::new(reference(1), output()),
            Utxo::new(reference(2), output()),
        ])
    }

    fn validator() -> AdmissionValidator {
        AdmissionValidator::new(ProtocolParameters::default())
    }

    fn min_fee() -> u64 {
        ProtocolParameters::default().min_fee(SIZE)
    }

    fn transaction(inputs: Vec<OutputReference>, outputs: usize, fee: u64) -> Transaction {
        Transaction::new(TransactionBody::new(inputs, vec![output(); outputs], fee)).unwrap()
    }

    #[test]
    fn accepts_well_formed_transaction() {
        let transaction = transaction(vec![reference(1), reference(2)], 1, min_fee());
        assert_eq!(validator().validate(&transaction, SIZE, &utxos()), Ok(()));
        assert!(validator().is_valid(&transaction, SIZE, &utxos()));
    }

    #[test]
    fn rejects_missing_inputs_before_anything_else() {
        let transaction = transaction(vec![], 0, 0);
        assert_eq!(
            validator().validate(&transaction, u64::MAX, &utxos()),
            Err(Rejection::NoInputs)
        );
    }

    #[test]
    fn rejects_missing_outputs() {
        let transaction = transaction(vec![reference(1)], 0, min_fee());
        assert_eq!(
            validator().validate(&transaction, SIZE, &utxos()),
            Err(Rejection::NoOutputs)
        );
    }

    #[test]
    fn rejects_duplicate_inputs() {
        let transaction = transaction(vec![reference(1), reference(1)], 1, min_fee());
        assert_eq!(
            validator().validate(&transaction, SIZE, &utxos()),
            Err(Rejection::DuplicateInput(reference(1)))
        );
    }

    #[test]
    fn distinguishes_spent_from_unknown_inputs() {
        let mut utxos = utxos();
        utxos.remove(&reference(2));
        let spent = transaction(vec![reference(1), reference(2)], 1, min_fee());
        assert_eq!(
            validator().validate(&spent, SIZE, &utxos),
            Err(Rejection::AlreadySpent(reference(2)))
        );
        let unknown = transaction(vec![reference(9)], 1, min_fee());
        assert_eq!(
            validator().validate(&unknown, SIZE, &utxos),
            Err(Rejection::UnknownInput(reference(9)))
        );
    }

    #[test]
    fn rejects_oversized_transaction() {
        let max_size = ProtocolParameters::default().max_tx_size;
        let transaction = transaction(vec![reference(1)], 1, u64::MAX);
        assert_eq!(
            validator().validate(&transaction, max_size + 1, &utxos()),
            Err(Rejection::SizeExceedsMaximum {
                size: max_size + 1,
                max_size
            })
        );
        assert_eq!(
            validator().validate(&transaction, max_size, &utxos()),
            Ok(())
        );
    }

    #[test]
    fn rejects_underpriced_transaction() {
        let transaction = transaction(vec![reference(1)], 1, min_fee() - 1);
        assert_eq!(
            validator().validate(&transaction, SIZE, &utxos()),
            Err(Rejection::InsufficientFee {
                declared: min_fee() - 1,
                minimum: min_fee()
            })
        );
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(Rejection::NoInputs.to_string(), "no inputs");
        assert_eq!(Rejection::NoOutputs.to_string(), "no outputs");
        assert!(Rejection::AlreadySpent(reference(1))
            .to_string()
            .starts_with("already spent"));
    }
}
