//! Effective priority: base priority plus aging, minus a preemption penalty.

use serde::{Deserialize, Serialize};

use crate::core::Token;

/// Default priority points gained per waiting minute.
pub const DEFAULT_AGING_FACTOR: f64 = 0.3;
/// Default priority points lost per preemption.
pub const DEFAULT_REALLOCATION_PENALTY: i64 = 10;

const MS_PER_MINUTE: u128 = 60_000;

/// Computes a token's effective priority at a point in time.
///
/// `base + floor(aging_factor * waiting_minutes) - penalty * preemptions`,
/// where `waiting_minutes` counts whole minutes since creation and is 0 when
/// `now` precedes the token's creation time. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityCalculator {
    aging_factor: f64,
    reallocation_penalty: i64,
}

impl Default for PriorityCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_AGING_FACTOR, DEFAULT_REALLOCATION_PENALTY)
    }
}

impl PriorityCalculator {
    /// Create a calculator with explicit weights.
    #[must_use]
    pub const fn new(aging_factor: f64, reallocation_penalty: i64) -> Self {
        Self {
            aging_factor,
            reallocation_penalty,
        }
    }

    /// Points gained per waiting minute.
    #[must_use]
    pub const fn aging_factor(&self) -> f64 {
        self.aging_factor
    }

    /// Points lost per preemption.
    #[must_use]
    pub const fn reallocation_penalty(&self) -> i64 {
        self.reallocation_penalty
    }

    /// Whole minutes between `created_at_ms` and `now_ms`, clamped at 0.
    #[must_use]
    pub const fn waiting_minutes(created_at_ms: u128, now_ms: u128) -> u128 {
        now_ms.saturating_sub(created_at_ms) / MS_PER_MINUTE
    }

    /// Effective priority of `token` at `now_ms`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn calculate(&self, token: &Token, now_ms: u128) -> i64 {
        let minutes = Self::waiting_minutes(token.created_at_ms(), now_ms);
        let aging = (self.aging_factor * minutes as f64).floor() as i64;
        let penalty = self
            .reallocation_penalty
            .saturating_mul(i64::from(token.preemption_count()));

        let effective = token
            .base_priority()
            .saturating_add(aging)
            .saturating_sub(penalty);

        tracing::debug!(
            token = %token.id(),
            waiting_minutes = %minutes,
            effective,
            "computed effective priority"
        );
        effective
    }
}
