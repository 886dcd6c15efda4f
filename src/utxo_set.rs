use crate::{Address, OutputReference, Utxo};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, HashSet};

/// The unspent transaction outputs of the ledger, plus an index of the outputs each address
/// owns.
///
/// Invariants:
///   - A reference is in the address index under address A iff it is in `utxos` and its output
///     is owned by A.
///   - The address index never holds an empty set.
#[derive(Debug, Clone, Default)]
pub struct UtxoSet {
    utxos: HashMap<OutputReference, Utxo>,
    addresses: HashMap<Address, BTreeSet<OutputReference>>,
    // References that were present at some point and have since been removed. Never pruned, so
    // it grows by one entry per spent output for the life of the set.
    spent: HashSet<OutputReference>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_utxos<I: IntoIterator<Item = Utxo>>(utxos: I) -> Self {
        let mut set = Self::new();
        for utxo in utxos {
            set.insert(utxo);
        }
        set
    }

    /// Inserts the output unless its reference already exists, in which case the existing
    /// output is kept.
    /// Returns whether the output was inserted.
    pub fn insert(&mut self, utxo: Utxo) -> bool {
        match self.utxos.entry(*utxo.reference()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                self.addresses
                    .entry(utxo.address().clone())
                    .or_default()
                    .insert(*utxo.reference());
                e.insert(utxo);
                true
            }
        }
    }

    /// Removes the output with the given reference and returns it.
    /// Removing an unknown reference has no effect.
    pub fn remove(&mut self, reference: &OutputReference) -> Option<Utxo> {
        let utxo = self.utxos.remove(reference)?;
        if let Entry::Occupied(mut e) = self.addresses.entry(utxo.address().clone()) {
            e.get_mut().remove(reference);
            if e.get().is_empty() {
                e.remove();
            }
        }
        self.spent.insert(*reference);
        Some(utxo)
    }

    pub fn get(&self, reference: &OutputReference) -> Option<&Utxo> {
        self.utxos.get(reference)
    }

    pub fn contains(&self, reference: &OutputReference) -> bool {
        self.utxos.contains_key(reference)
    }

    /// Returns whether the reference was once unspent and has been removed since.
    pub fn is_spent(&self, reference: &OutputReference) -> bool {
        self.spent.contains(reference)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Returns a copy of all unspent outputs.
    pub fn snapshot(&self) -> HashMap<OutputReference, Utxo> {
        self.utxos.clone()
    }

    /// Returns a copy of the outputs owned by the address, ordered by reference.
    pub fn utxos_at(&self, address: &Address) -> Vec<Utxo> {
        self.addresses
            .get(address)
            .map(|references| {
                references
                    .iter()
                    .filter_map(|reference| self.utxos.get(reference))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns all addresses that own at least one output.
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.addresses.keys()
    }

    /// Resolves the references to copies of their outputs.
    /// Duplicates are resolved once, at their first position, and references that are not
    /// unspent are left out.
    pub fn resolve_many<'a, I>(&self, references: I) -> Vec<Utxo>
    where
        I: IntoIterator<Item = &'a OutputReference>,
    {
        let mut seen = HashSet::new();
        references
            .into_iter()
            .filter(|reference| seen.insert(**reference))
            .filter_map(|reference| self.utxos.get(reference))
            .cloned()
            .collect()
    }
}
