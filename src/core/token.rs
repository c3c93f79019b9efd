//! Admission tokens and their source categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique token identifier.
pub type TokenId = Uuid;

/// Channel a request arrived through. Fixes the token's base priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenSource {
    /// Emergency case.
    Emergency,
    /// Paid priority booking.
    Paid,
    /// Follow-up visit.
    FollowUp,
    /// Online booking.
    Online,
    /// Walk-in patient.
    WalkIn,
}

impl TokenSource {
    /// All sources, highest base priority first.
    pub const ALL: [Self; 5] = [
        Self::Emergency,
        Self::Paid,
        Self::FollowUp,
        Self::Online,
        Self::WalkIn,
    ];

    /// Base priority for this source.
    #[must_use]
    pub const fn base_priority(self) -> i64 {
        match self {
            Self::Emergency => 100,
            Self::Paid => 85,
            Self::FollowUp => 65,
            Self::Online => 50,
            Self::WalkIn => 40,
        }
    }

    /// Wire name of the source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "EMERGENCY",
            Self::Paid => "PAID",
            Self::FollowUp => "FOLLOW_UP",
            Self::Online => "ONLINE",
            Self::WalkIn => "WALK_IN",
        }
    }
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TokenSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|src| src.as_str() == normalized)
            .ok_or_else(|| format!("unknown token source `{s}`"))
    }
}

/// One admission request.
///
/// Identity, requester, source and creation time never change. The engine
/// owns the bookkeeping fields (`preemption_count`, `snapshot_priority`,
/// `admitted`) and only touches them while holding the owning slot's lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    id: TokenId,
    requester_id: String,
    source: TokenSource,
    base_priority: i64,
    created_at_ms: u128,
    pub(crate) preemption_count: u32,
    pub(crate) snapshot_priority: i64,
    pub(crate) admitted: bool,
}

impl Token {
    /// Create a token for `requester_id` stamped with `created_at_ms`.
    pub fn new(requester_id: impl Into<String>, source: TokenSource, created_at_ms: u128) -> Self {
        let base_priority = source.base_priority();
        Self {
            id: Uuid::new_v4(),
            requester_id: requester_id.into(),
            source,
            base_priority,
            created_at_ms,
            preemption_count: 0,
            snapshot_priority: base_priority,
            admitted: false,
        }
    }

    /// Unique identifier.
    #[must_use]
    pub const fn id(&self) -> TokenId {
        self.id
    }

    /// Requester (patient) identifier.
    #[must_use]
    pub fn requester_id(&self) -> &str {
        &self.requester_id
    }

    /// Source category.
    #[must_use]
    pub const fn source(&self) -> TokenSource {
        self.source
    }

    /// Base priority derived from the source.
    #[must_use]
    pub const fn base_priority(&self) -> i64 {
        self.base_priority
    }

    /// Creation timestamp (ms since epoch).
    #[must_use]
    pub const fn created_at_ms(&self) -> u128 {
        self.created_at_ms
    }

    /// Number of times this token was evicted from the admitted set.
    #[must_use]
    pub const fn preemption_count(&self) -> u32 {
        self.preemption_count
    }

    /// Effective priority captured at the last (re)insertion.
    #[must_use]
    pub const fn snapshot_priority(&self) -> i64 {
        self.snapshot_priority
    }

    /// Whether the token currently holds a place in the admitted set.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        self.admitted
    }
}
