//! Capped, first-seen collection of matches.
//!
//! Every lookup in the engine stops at a fixed number of hits and keeps them
//! in source order. Order of discovery is the only ranking.

/// Take the first `limit` items of `source` that satisfy `predicate`.
pub fn collect_up_to<T, I, P>(limit: usize, source: I, predicate: P) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    P: FnMut(&T) -> bool,
{
    source.into_iter().filter(predicate).take(limit).collect()
}

/// Accumulator that stops accepting items once `limit` is reached.
///
/// Used for multi-pass matching where a later, looser pass only tops up what
/// an earlier pass left room for.
#[derive(Debug, Clone)]
pub struct Bounded<T> {
    limit: usize,
    items: Vec<T>,
}

impl<T> Bounded<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            items: Vec::with_capacity(limit.min(16)),
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.limit
    }

    /// Push an item; returns `false` once full.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Add items of `source` accepted by `predicate` until full.
    ///
    /// The predicate also sees what was already collected.
    pub fn extend_matching<I, P>(&mut self, source: I, mut predicate: P) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        P: FnMut(&[T], &T) -> bool,
    {
        for item in source {
            if self.is_full() {
                break;
            }
            if predicate(&self.items, &item) {
                self.items.push(item);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}
