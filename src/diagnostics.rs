use crate::{Rejection, TransactionHash};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    Info,
    Warning,
}

/// A non-fatal condition reported by the emulator.
/// None of these abort the operation that produced them.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Diagnostic {
    /// `await_block` was called with a height of zero.
    InvalidAdvanceHeight { height: u64 },
    /// A submitted transaction failed admission and was not added to the pool.
    TransactionRejected {
        hash: TransactionHash,
        reason: Rejection,
    },
    /// The transaction at the head of the pool did not fit into the rest of the block and waits
    /// for the next one.
    TransactionDeferred {
        hash: TransactionHash,
        size: u64,
        remaining: u64,
    },
    /// The transaction at the head of the pool can never fit into a block and was discarded.
    TransactionDropped {
        hash: TransactionHash,
        size: u64,
        max_block_body_size: u64,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::TransactionDeferred { .. } => Severity::Info,
            Diagnostic::InvalidAdvanceHeight { .. }
            | Diagnostic::TransactionRejected { .. }
            | Diagnostic::TransactionDropped { .. } => Severity::Warning,
        }
    }

    /// The rejection reason, if this is a rejected transaction.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Diagnostic::TransactionRejected { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::InvalidAdvanceHeight { height } => write!(
                f,
                "Invalid call to await_block with height {}. Argument height must be greater than zero.",
                height
            ),
            Diagnostic::TransactionRejected { hash, reason } => {
                write!(f, "Transaction {} is invalid: {}", hash, reason)
            }
            Diagnostic::TransactionDeferred {
                hash,
                size,
                remaining,
            } => write!(
                f,
                "Transaction {} of {} bytes does not fit the {} bytes left in the block. Deferring it to the next block.",
                hash, size, remaining
            ),
            Diagnostic::TransactionDropped {
                hash,
                size,
                max_block_body_size,
            } => write!(
                f,
                "Transaction {} of {} bytes is too large to fit in a block of {} bytes. Skipping transaction.",
                hash, size, max_block_body_size
            ),
        }
    }
}

/// Keeps every diagnostic the emulator reported, in order, and forwards each one to the log.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => tracing::info!("{}", diagnostic),
            Severity::Warning => tracing::warn!("{}", diagnostic),
        }
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.entries.last()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sha256;

    fn hash() -> TransactionHash {
        TransactionHash::new(Sha256::from_raw([0; 32]))
    }

    #[test]
    fn records_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(Diagnostic::InvalidAdvanceHeight { height: 0 });
        diagnostics.record(Diagnostic::TransactionDeferred {
            hash: hash(),
            size: 10,
            remaining: 5,
        });
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warnings().count(), 1);
        assert!(matches!(
            diagnostics.last(),
            Some(Diagnostic::TransactionDeferred { .. })
        ));
        diagnostics.clear();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn rejection_is_exposed() {
        let diagnostic = Diagnostic::TransactionRejected {
            hash: hash(),
            reason: Rejection::NoOutputs,
        };
        assert_eq!(diagnostic.rejection(), Some(&Rejection::NoOutputs));
        assert!(diagnostic.to_string().ends_with("is invalid: no outputs"));
        assert_eq!(
            Diagnostic::InvalidAdvanceHeight { height: 0 }.rejection(),
            None
        );
    }

    #[test]
    fn dropped_message() {
        let diagnostic = Diagnostic::TransactionDropped {
            hash: hash(),
            size: 90_000,
            max_block_body_size: 65_536,
        };
        assert_eq!(diagnostic.severity(), Severity::Warning);
        assert!(diagnostic.to_string().ends_with("Skipping transaction."));
    }
}
