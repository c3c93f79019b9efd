//! Doctor and slot seeding configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A slot to create for a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Slot identifier, unique per doctor.
    pub id: String,
    /// Nominal capacity before efficiency scaling.
    pub base_capacity: u32,
}

/// A doctor to register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorConfig {
    /// Doctor identifier.
    pub id: String,
    /// Efficiency multiplier applied to every slot's base capacity.
    pub efficiency: f64,
    /// Slots owned by this doctor.
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

/// Root registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Doctors to register.
    pub doctors: Vec<DoctorConfig>,
}

impl DoctorConfig {
    /// Validate doctor configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("doctor id must not be empty".into());
        }
        if !(self.efficiency.is_finite() && self.efficiency > 0.0) {
            return Err("efficiency must be a positive finite number".into());
        }
        let mut seen = HashSet::new();
        for slot in &self.slots {
            if slot.id.trim().is_empty() {
                return Err("slot id must not be empty".into());
            }
            if slot.base_capacity == 0 {
                return Err(format!("slot `{}` base_capacity must be greater than 0", slot.id));
            }
            if !seen.insert(slot.id.as_str()) {
                return Err(format!("duplicate slot `{}`", slot.id));
            }
        }
        Ok(())
    }
}

impl RegistryConfig {
    /// Validate all doctors and ensure at least one exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.doctors.is_empty() {
            return Err("at least one doctor must be defined".into());
        }
        let mut seen = HashSet::new();
        for doctor in &self.doctors {
            doctor
                .validate()
                .map_err(|e| format!("doctor `{}` invalid: {e}", doctor.id))?;
            if !seen.insert(doctor.id.as_str()) {
                return Err(format!("duplicate doctor `{}`", doctor.id));
            }
        }
        Ok(())
    }

    /// Parse registry configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
