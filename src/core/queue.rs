//! Snapshot-keyed priority heap backing a slot's admitted and waiting sets.
//!
//! Entries are ranked by the token's `snapshot_priority` captured at insertion
//! time. Nothing in the comparator reads the clock, so an entry's rank cannot
//! change while it sits in the heap.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{Token, TokenId};

/// Which end of the priority range surfaces first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOrder {
    /// Lowest snapshot priority at the head; ties surface the most recent
    /// insertion. Used for the admitted set (eviction candidate).
    LowestFirst,
    /// Highest snapshot priority at the head; ties surface the earliest
    /// insertion. Used for the waiting set (promotion candidate).
    HighestFirst,
}

/// Heap entry. `rank` is precomputed so the max-heap pops the right end.
struct Ranked {
    rank: (i64, i64),
    token: Token,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank)
    }
}

/// Binary heap of tokens ordered by snapshot priority.
/// O(log n) push/pop, O(1) peek, O(n) removal by id.
pub struct TokenHeap {
    order: HeapOrder,
    next_seq: i64,
    entries: BinaryHeap<Ranked>,
}

impl TokenHeap {
    /// Create an empty heap with the given head order.
    #[must_use]
    pub const fn new(order: HeapOrder) -> Self {
        Self {
            order,
            next_seq: 0,
            entries: BinaryHeap::new(),
        }
    }

    /// Head order of this heap.
    #[must_use]
    pub const fn order(&self) -> HeapOrder {
        self.order
    }

    fn rank_for(&self, priority: i64, seq: i64) -> (i64, i64) {
        match self.order {
            HeapOrder::LowestFirst => (priority.saturating_neg(), seq),
            HeapOrder::HighestFirst => (priority, -seq),
        }
    }

    /// Insert a token keyed by its current `snapshot_priority`.
    pub fn push(&mut self, token: Token) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let rank = self.rank_for(token.snapshot_priority, seq);
        self.entries.push(Ranked { rank, token });
    }

    /// Remove and return the head token.
    pub fn pop(&mut self) -> Option<Token> {
        self.entries.pop().map(|r| r.token)
    }

    /// Borrow the head token.
    #[must_use]
    pub fn peek(&self) -> Option<&Token> {
        self.entries.peek().map(|r| &r.token)
    }

    /// Remove the token with `id`, wherever it sits.
    pub fn remove(&mut self, id: &TokenId) -> Option<Token> {
        if !self.contains(id) {
            return None;
        }
        let mut removed = None;
        let entries: Vec<_> = self.entries.drain().collect();
        self.entries = entries
            .into_iter()
            .filter_map(|r| {
                if removed.is_none() && r.token.id() == *id {
                    removed = Some(r.token);
                    None
                } else {
                    Some(r)
                }
            })
            .collect();
        removed
    }

    /// Borrow the token with `id`, if present.
    #[must_use]
    pub fn get(&self, id: &TokenId) -> Option<&Token> {
        self.entries
            .iter()
            .map(|r| &r.token)
            .find(|t| t.id() == *id)
    }

    /// Whether a token with `id` is present.
    #[must_use]
    pub fn contains(&self, id: &TokenId) -> bool {
        self.entries.iter().any(|r| r.token.id() == *id)
    }

    /// Number of tokens held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no tokens are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clones of the held tokens, head first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Token> {
        let mut ranked: Vec<_> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.rank.cmp(&a.rank));
        ranked.into_iter().map(|r| r.token.clone()).collect()
    }

    /// Ids of the held tokens, head first.
    #[must_use]
    pub fn ids(&self) -> Vec<TokenId> {
        self.snapshot().iter().map(Token::id).collect()
    }

    /// 1-based position of `id` counted from the head, if present.
    #[must_use]
    pub fn position(&self, id: &TokenId) -> Option<usize> {
        self.ids().iter().position(|t| t == id).map(|i| i + 1)
    }
}

impl std::fmt::Debug for TokenHeap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenHeap")
            .field("order", &self.order)
            .field("len", &self.len())
            .finish()
    }
}
