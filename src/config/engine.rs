//! Engine tuning and policy configuration.

use std::env;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::priority::{DEFAULT_AGING_FACTOR, DEFAULT_REALLOCATION_PENALTY};
use crate::core::{AppResult, PriorityCalculator};

/// What cancelling a token that is only on the waiting list does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistCancellation {
    /// Cancellation only targets admitted tokens; waiting tokens stay put.
    #[default]
    Ignore,
    /// Waiting tokens are removed as well.
    Remove,
}

/// What happens to admissions above a reduced effective capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityShrink {
    /// Keep existing admissions; block new ones until attrition.
    #[default]
    Lazy,
    /// Demote the lowest-priority excess admissions to waiting immediately.
    EvictExcess,
}

/// What to do with a token when the slot is at capacity yet holds no
/// admissions, which only happens with a zero effective capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroCapacityAdmission {
    /// Admit the token anyway and flag the outcome.
    #[default]
    Admit,
    /// Keep the ceiling and put the token on the waiting list.
    Waitlist,
}

macro_rules! parse_policy {
    ($ty:ty, $($name:literal => $variant:expr),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!("unknown {} `{other}`", stringify!($ty))),
                }
            }
        }
    };
}

parse_policy!(WaitlistCancellation, "ignore" => Self::Ignore, "remove" => Self::Remove);
parse_policy!(CapacityShrink, "lazy" => Self::Lazy, "evict_excess" => Self::EvictExcess);
parse_policy!(ZeroCapacityAdmission, "admit" => Self::Admit, "waitlist" => Self::Waitlist);

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Priority points gained per waiting minute.
    pub aging_factor: f64,
    /// Priority points lost per preemption.
    pub reallocation_penalty: i64,
    /// Cancellation policy for waiting tokens.
    pub waitlist_cancellation: WaitlistCancellation,
    /// Policy for admissions above a reduced capacity.
    pub capacity_shrink: CapacityShrink,
    /// Handling of requests against a slot with no capacity and no admissions.
    pub zero_capacity: ZeroCapacityAdmission,
    /// Maximum audit events retained in memory.
    pub audit_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aging_factor: DEFAULT_AGING_FACTOR,
            reallocation_penalty: DEFAULT_REALLOCATION_PENALTY,
            waitlist_cancellation: WaitlistCancellation::default(),
            capacity_shrink: CapacityShrink::default(),
            zero_capacity: ZeroCapacityAdmission::default(),
            audit_capacity: 1024,
        }
    }
}

fn env_override<T>(key: &str, target: &mut T) -> AppResult<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = env::var(key) {
        *target = raw
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: `{raw}`"))?;
    }
    Ok(())
}

impl EngineConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.aging_factor.is_finite() || self.aging_factor < 0.0 {
            return Err("aging_factor must be a non-negative finite number".into());
        }
        if self.reallocation_penalty < 0 {
            return Err("reallocation_penalty must not be negative".into());
        }
        if self.audit_capacity == 0 {
            return Err("audit_capacity must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse engine configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `OPD_*` environment variables, after loading a
    /// `.env` file if one exists.
    ///
    /// Recognised keys: `OPD_AGING_FACTOR`, `OPD_REALLOCATION_PENALTY`,
    /// `OPD_WAITLIST_CANCELLATION`, `OPD_CAPACITY_SHRINK`, `OPD_ZERO_CAPACITY`,
    /// `OPD_AUDIT_CAPACITY`.
    ///
    /// # Errors
    ///
    /// Fails if a variable does not parse or the result does not validate.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        env_override("OPD_AGING_FACTOR", &mut cfg.aging_factor)?;
        env_override("OPD_REALLOCATION_PENALTY", &mut cfg.reallocation_penalty)?;
        env_override("OPD_WAITLIST_CANCELLATION", &mut cfg.waitlist_cancellation)?;
        env_override("OPD_CAPACITY_SHRINK", &mut cfg.capacity_shrink)?;
        env_override("OPD_ZERO_CAPACITY", &mut cfg.zero_capacity)?;
        env_override("OPD_AUDIT_CAPACITY", &mut cfg.audit_capacity)?;
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }

    /// Priority calculator using the configured weights.
    #[must_use]
    pub const fn calculator(&self) -> PriorityCalculator {
        PriorityCalculator::new(self.aging_factor, self.reallocation_penalty)
    }
}
