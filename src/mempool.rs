use std::collections::VecDeque;

/// A first-in-first-out collection of transactions that were accepted, but are not yet in a
/// block.
/// The pool has no capacity limit and never reorders, expires or evicts its entries: they
/// leave it only through settlement.
#[derive(Debug, Clone)]
pub struct Mempool<T> {
    transactions: VecDeque<T>,
}

impl<T> Mempool<T> {
    pub fn new() -> Self {
        Self {
            transactions: VecDeque::new(),
        }
    }

    /// Appends the transaction at the back of the pool.
    pub fn enqueue(&mut self, transaction: T) {
        self.transactions.push_back(transaction);
    }

    /// Removes and returns the oldest transaction, or `None` if the pool is empty.
    pub fn dequeue(&mut self) -> Option<T> {
        self.transactions.pop_front()
    }

    /// Returns the oldest transaction without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.transactions.front()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Iterates from the oldest to the newest transaction.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.transactions.iter()
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
    }
}

impl<T: Clone> Mempool<T> {
    /// Returns a copy of all transactions, oldest first.
    pub fn as_vec(&self) -> Vec<T> {
        self.transactions.iter().cloned().collect()
    }
}

impl<T> Default for Mempool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_is_empty() {
        let pool = Mempool::<u32>::new();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.peek(), None);
        assert!(pool.as_vec().is_empty());
    }

    #[test]
    fn dequeues_in_insertion_order() {
        let mut pool = Mempool::new();
        pool.enqueue(1);
        pool.enqueue(2);
        assert_eq!(pool.as_vec(), vec![1, 2]);

        assert_eq!(pool.dequeue(), Some(1));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.peek(), Some(&2));

        assert_eq!(pool.dequeue(), Some(2));
        assert!(pool.is_empty());
        assert_eq!(pool.dequeue(), None);
    }

    #[test]
    fn peek_does_not_remove() {
        let mut pool = Mempool::new();
        pool.enqueue(1);
        pool.enqueue(2);
        assert_eq!(pool.peek(), Some(&1));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn interleaved_operations_keep_order() {
        let mut pool = Mempool::new();
        pool.enqueue(1);
        pool.enqueue(2);
        pool.enqueue(3);
        assert_eq!(pool.dequeue(), Some(1));
        assert_eq!(pool.dequeue(), Some(2));
        pool.enqueue(4);
        assert_eq!(pool.peek(), Some(&3));
        assert_eq!(pool.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(pool.dequeue(), Some(3));
        assert_eq!(pool.dequeue(), Some(4));
        assert!(pool.is_empty());
    }

    #[test]
    fn clear_empties_the_pool() {
        let mut pool = Mempool::new();
        pool.enqueue("a");
        pool.enqueue("b");
        pool.clear();
        assert!(pool.is_empty());
    }
}
