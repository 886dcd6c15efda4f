use crate::codec::{BincodeHexCodec, CodecError, TransactionCodec};
use crate::provider::{GetGenesisInfos, GetProtocolParameters, ResolveUtxos, SubmitTx};
use crate::{
    AdmissionValidator, Address, Diagnostic, Diagnostics, EmulatorConfig, GenesisInfos,
    LedgerClock, Mempool, OutputReference, OverflowPolicy, ProtocolParameters, Rejection,
    Transaction, TransactionHash, TxBuilder, Utxo, UtxoSet,
};
use std::collections::HashMap;

/// A transaction waiting in the pool, with its encoded size computed at submission.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    transaction: Transaction,
    size: u64,
}

impl PendingTransaction {
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn hash(&self) -> &TransactionHash {
        self.transaction.hash()
    }
}

/// The result of submitting a transaction.
/// The hash is always known, even when the transaction was rejected.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Submission {
    hash: TransactionHash,
    outcome: Result<(), Rejection>,
}

impl Submission {
    pub fn hash(&self) -> &TransactionHash {
        &self.hash
    }

    pub fn is_accepted(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        self.outcome.as_ref().err()
    }

    pub fn outcome(&self) -> &Result<(), Rejection> {
        &self.outcome
    }
}

/// What happened during a call to `await_block`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AdvanceReport {
    pub blocks_advanced: u64,
    // Applied transactions, in settlement order.
    pub settled: Vec<TransactionHash>,
    // One entry per block that closed early because of the head transaction.
    pub deferred: Vec<TransactionHash>,
    pub dropped: Vec<TransactionHash>,
    // Bytes used by each block that was filled, skipped blocks excluded.
    pub block_sizes: Vec<u64>,
}

/// An in-memory ledger that behaves like a node of a real network: it keeps the unspent outputs,
/// admits transactions into a pool and settles them when blocks are produced on request.
///
/// The ledger only changes in two ways:
///   - `submit` appends admitted transactions to the pool;
///   - `await_block` moves the clock forward and applies pooled transactions to the outputs.
pub struct Emulator {
    utxos: UtxoSet,
    mempool: Mempool<PendingTransaction>,
    clock: LedgerClock,
    genesis_infos: GenesisInfos,
    protocol_parameters: ProtocolParameters,
    validator: AdmissionValidator,
    codec: BincodeHexCodec,
    debug_level: u8,
    overflow_policy: OverflowPolicy,
    validate_transactions: bool,
    diagnostics: Diagnostics,
}

impl Emulator {
    pub fn new(config: EmulatorConfig) -> Self {
        let config = config.normalized();
        let utxos = UtxoSet::from_utxos(config.initial_utxos);
        tracing::debug!(
            "Starting emulator with {} initial outputs at slot {}.",
            utxos.len(),
            config.genesis_infos.start_slot
        );
        Self {
            utxos,
            mempool: Mempool::new(),
            clock: LedgerClock::at_genesis(&config.genesis_infos),
            genesis_infos: config.genesis_infos,
            protocol_parameters: config.protocol_parameters,
            validator: AdmissionValidator::new(config.protocol_parameters),
            codec: BincodeHexCodec,
            debug_level: config.debug_level,
            overflow_policy: config.overflow_policy,
            validate_transactions: config.validate_transactions,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Creates an emulator with default presets and the given initial outputs.
    pub fn with_utxos<I: IntoIterator<Item = Utxo>>(initial_utxos: I) -> Self {
        Self::new(EmulatorConfig::with_initial_utxos(
            initial_utxos.into_iter().collect(),
        ))
    }

    /// Returns a copy of all unspent outputs.
    pub fn utxos(&self) -> HashMap<OutputReference, Utxo> {
        self.utxos.snapshot()
    }

    /// Returns a copy of the unspent outputs owned by the address.
    pub fn utxos_at(&self, address: &Address) -> Vec<Utxo> {
        self.utxos.utxos_at(address)
    }

    pub fn utxo_set(&self) -> &UtxoSet {
        &self.utxos
    }

    pub fn mempool(&self) -> &Mempool<PendingTransaction> {
        &self.mempool
    }

    pub fn clock(&self) -> &LedgerClock {
        &self.clock
    }

    pub fn slot(&self) -> u64 {
        self.clock.slot()
    }

    pub fn time(&self) -> u64 {
        self.clock.time()
    }

    pub fn block_height(&self) -> u64 {
        self.clock.block_height()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn tx_max_size(&self) -> u64 {
        self.protocol_parameters.max_tx_size
    }

    /// A builder that uses the emulator's protocol parameters.
    pub fn tx_builder(&self) -> TxBuilder {
        TxBuilder::new(self.protocol_parameters)
    }

    pub fn tx_size(&self, transaction: &Transaction) -> Result<u64, CodecError> {
        self.codec.encoded_size(transaction)
    }

    /// Resolves the references that are currently unspent, in the order they were first
    /// requested. Duplicates and spent or unknown references are left out.
    pub fn resolve(&self, references: &[OutputReference]) -> Vec<Utxo> {
        self.utxos.resolve_many(references)
    }

    /// Validates the transaction and, if it is valid, appends it to the pool.
    /// A rejected transaction is reported in the diagnostics and the returned submission.
    pub fn submit(&mut self, transaction: Transaction) -> Result<Submission, CodecError> {
        let size = self.tx_size(&transaction)?;
        let hash = *transaction.hash();
        let outcome = if self.validate_transactions {
            self.validator.validate(&transaction, size, &self.utxos)
        } else {
            Ok(())
        };

        match &outcome {
            Ok(()) => {
                tracing::debug!("Transaction {} of {} bytes added to the pool.", hash, size);
                self.mempool.enqueue(PendingTransaction { transaction, size });
            }
            Err(reason) => self.diagnostics.record(Diagnostic::TransactionRejected {
                hash,
                reason: reason.clone(),
            }),
        }
        Ok(Submission { hash, outcome })
    }

    /// Decodes a hex wire transaction and submits it.
    pub fn submit_wire(&mut self, wire: &str) -> Result<Submission, CodecError> {
        let transaction = self.codec.decode_wire(wire)?;
        self.submit(transaction)
    }

    /// Produces `height` blocks.
    ///
    /// Each block moves the clock one slot forward, then takes transactions from the head of
    /// the pool for as long as they fit into the block body. The first transaction that does
    /// not fit closes the block, even if a later one would fit.
    /// Once the pool is empty, the remaining blocks are skipped over in one step.
    pub fn await_block(&mut self, height: u64) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if height == 0 {
            self.diagnostics
                .record(Diagnostic::InvalidAdvanceHeight { height });
            return report;
        }

        let mut remaining = height;
        while remaining > 0 {
            if self.mempool.is_empty() {
                self.clock.advance(remaining);
                report.blocks_advanced += remaining;
                tracing::info!(
                    "Advanced to block number {} by height {} with an empty pool (slot {}). Time: {}",
                    self.clock.block_height(),
                    remaining,
                    self.clock.slot(),
                    self.clock.time_iso()
                );
                break;
            }

            self.clock.tick();
            let used = self.fill_block(&mut report);
            report.blocks_advanced += 1;
            report.block_sizes.push(used);
            tracing::info!(
                "Advanced to block number {} using {} bytes (slot {}). Time: {}",
                self.clock.block_height(),
                used,
                self.clock.slot(),
                self.clock.time_iso()
            );
            remaining -= 1;
        }
        report
    }

    /// Settles transactions from the head of the pool into the current block.
    /// Returns the number of bytes used.
    fn fill_block(&mut self, report: &mut AdvanceReport) -> u64 {
        let max_block_body_size = self.protocol_parameters.max_block_body_size;
        let mut used = 0u64;

        while let Some(head) = self.mempool.peek() {
            let size = head.size();
            let hash = *head.hash();

            if used.saturating_add(size) <= max_block_body_size {
                if let Some(pending) = self.mempool.dequeue() {
                    self.apply(&pending.transaction);
                    report.settled.push(hash);
                    used += size;
                }
                continue;
            }

            if self.overflow_policy == OverflowPolicy::Drop && size > max_block_body_size {
                self.mempool.dequeue();
                self.diagnostics.record(Diagnostic::TransactionDropped {
                    hash,
                    size,
                    max_block_body_size,
                });
                report.dropped.push(hash);
            } else {
                self.diagnostics.record(Diagnostic::TransactionDeferred {
                    hash,
                    size,
                    remaining: max_block_body_size - used,
                });
                report.deferred.push(hash);
            }
            break;
        }
        used
    }

    /// Spends the inputs and creates the outputs of the transaction.
    fn apply(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            self.utxos.remove(input);
        }
        for utxo in transaction.produced_utxos() {
            self.utxos.insert(utxo);
        }

        if self.debug_level >= 2 {
            tracing::info!("Settled transaction {}", transaction);
        } else {
            tracing::debug!("Settled transaction {}", transaction.hash());
        }
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(EmulatorConfig::default())
    }
}

impl GetGenesisInfos for Emulator {
    fn genesis_infos(&self) -> GenesisInfos {
        self.genesis_infos
    }
}

impl GetProtocolParameters for Emulator {
    fn protocol_parameters(&self) -> ProtocolParameters {
        self.protocol_parameters
    }
}

impl ResolveUtxos for Emulator {
    fn resolve_utxos(&self, references: &[OutputReference]) -> Vec<Utxo> {
        self.resolve(references)
    }
}

impl SubmitTx for Emulator {
    fn submit_tx(&mut self, transaction: Transaction) -> Result<String, CodecError> {
        self.submit(transaction)
            .map(|submission| submission.hash().to_string())
    }

    fn submit_tx_wire(&mut self, wire: &str) -> Result<String, CodecError> {
        self.submit_wire(wire)
            .map(|submission| submission.hash().to_string())
    }
}
