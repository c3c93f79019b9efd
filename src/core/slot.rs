//! Capacity-bounded slot with its admitted/waiting heaps.

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::core::queue::{HeapOrder, TokenHeap};
use crate::core::{Token, TokenId};

/// `floor(base_capacity * efficiency)`, saturating at the `u32` range.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn scaled_capacity(base_capacity: u32, efficiency: f64) -> u32 {
    let scaled = (f64::from(base_capacity) * efficiency).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Mutable slot state. Only reachable through [`Slot::lock`].
#[derive(Debug)]
pub struct SlotState {
    effective_capacity: u32,
    admitted: TokenHeap,
    waiting: TokenHeap,
}

impl SlotState {
    fn new(effective_capacity: u32) -> Self {
        Self {
            effective_capacity,
            admitted: TokenHeap::new(HeapOrder::LowestFirst),
            waiting: TokenHeap::new(HeapOrder::HighestFirst),
        }
    }

    /// Current admission ceiling.
    #[must_use]
    pub const fn effective_capacity(&self) -> u32 {
        self.effective_capacity
    }

    /// Number of admitted tokens.
    #[must_use]
    pub fn admitted_len(&self) -> usize {
        self.admitted.len()
    }

    /// Number of waiting tokens.
    #[must_use]
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// True while another token can be admitted without eviction.
    #[must_use]
    pub fn has_free_capacity(&self) -> bool {
        self.admitted.len() < self.effective_capacity as usize
    }

    /// Number of admissions above the current ceiling.
    #[must_use]
    pub fn excess(&self) -> usize {
        self.admitted
            .len()
            .saturating_sub(self.effective_capacity as usize)
    }

    /// Lowest-priority admitted token.
    #[must_use]
    pub fn lowest_admitted(&self) -> Option<&Token> {
        self.admitted.peek()
    }

    /// Highest-priority waiting token.
    #[must_use]
    pub fn highest_waiting(&self) -> Option<&Token> {
        self.waiting.peek()
    }

    /// Insert into the admitted set, marking the token admitted.
    pub fn admit(&mut self, mut token: Token) {
        token.admitted = true;
        self.admitted.push(token);
    }

    /// Insert into the waiting set, marking the token not admitted.
    pub fn enqueue_waiting(&mut self, mut token: Token) {
        token.admitted = false;
        self.waiting.push(token);
    }

    /// Remove and return the lowest-priority admitted token.
    pub fn pop_lowest_admitted(&mut self) -> Option<Token> {
        self.admitted.pop()
    }

    /// Remove and return the highest-priority waiting token.
    pub fn pop_highest_waiting(&mut self) -> Option<Token> {
        self.waiting.pop()
    }

    /// Remove `id` from the admitted set.
    pub fn remove_admitted(&mut self, id: &TokenId) -> Option<Token> {
        self.admitted.remove(id)
    }

    /// Remove `id` from the waiting set.
    pub fn remove_waiting(&mut self, id: &TokenId) -> Option<Token> {
        self.waiting.remove(id)
    }

    /// Whether `id` is admitted.
    #[must_use]
    pub fn is_admitted(&self, id: &TokenId) -> bool {
        self.admitted.contains(id)
    }

    /// Whether `id` is waiting.
    #[must_use]
    pub fn is_waiting(&self, id: &TokenId) -> bool {
        self.waiting.contains(id)
    }

    /// Borrow the admitted token with `id`.
    #[must_use]
    pub fn admitted_token(&self, id: &TokenId) -> Option<&Token> {
        self.admitted.get(id)
    }

    /// Borrow the waiting token with `id`.
    #[must_use]
    pub fn waiting_token(&self, id: &TokenId) -> Option<&Token> {
        self.waiting.get(id)
    }

    /// 1-based position of `id` in the waiting set, head first.
    #[must_use]
    pub fn waiting_position(&self, id: &TokenId) -> Option<usize> {
        self.waiting.position(id)
    }

    /// Replace the admission ceiling.
    pub fn set_effective_capacity(&mut self, capacity: u32) {
        self.effective_capacity = capacity;
    }

    /// Clones of the admitted tokens, lowest priority first.
    #[must_use]
    pub fn admitted_tokens(&self) -> Vec<Token> {
        self.admitted.snapshot()
    }

    /// Clones of the waiting tokens, highest priority first.
    #[must_use]
    pub fn waiting_tokens(&self) -> Vec<Token> {
        self.waiting.snapshot()
    }
}

/// Point-in-time view of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    /// Slot identifier.
    pub slot_id: String,
    /// Nominal capacity.
    pub base_capacity: u32,
    /// Capacity after efficiency scaling.
    pub effective_capacity: u32,
    /// Admitted token ids, lowest priority first.
    pub admitted: Vec<TokenId>,
    /// Waiting token ids, highest priority first.
    pub waiting: Vec<TokenId>,
}

/// A doctor's time slot.
///
/// The admitted and waiting heaps and the effective capacity live behind a
/// single `parking_lot::Mutex`; every read that feeds a decision and every
/// mutation happens through one guard from [`Slot::lock`].
#[derive(Debug)]
pub struct Slot {
    id: String,
    base_capacity: u32,
    state: Mutex<SlotState>,
}

impl Slot {
    /// Create a slot whose effective capacity is `floor(base * efficiency)`.
    pub fn new(id: impl Into<String>, base_capacity: u32, efficiency: f64) -> Self {
        Self {
            id: id.into(),
            base_capacity,
            state: Mutex::new(SlotState::new(scaled_capacity(base_capacity, efficiency))),
        }
    }

    /// Slot identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Nominal capacity before efficiency scaling.
    #[must_use]
    pub const fn base_capacity(&self) -> u32 {
        self.base_capacity
    }

    /// Acquire the slot lock. Released when the guard drops.
    pub fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock()
    }

    /// Current effective capacity.
    #[must_use]
    pub fn effective_capacity(&self) -> u32 {
        self.lock().effective_capacity()
    }

    /// Number of admitted tokens.
    #[must_use]
    pub fn admitted_len(&self) -> usize {
        self.lock().admitted_len()
    }

    /// Number of waiting tokens.
    #[must_use]
    pub fn waiting_len(&self) -> usize {
        self.lock().waiting_len()
    }

    /// Consistent view of capacity and both heaps.
    #[must_use]
    pub fn snapshot(&self) -> SlotSnapshot {
        let state = self.lock();
        SlotSnapshot {
            slot_id: self.id.clone(),
            base_capacity: self.base_capacity,
            effective_capacity: state.effective_capacity(),
            admitted: state.admitted.ids(),
            waiting: state.waiting.ids(),
        }
    }
}
