//! Type definitions for the compatibility engine.
//!
//! Rule constants deserialize from TOML; evaluation output serializes to
//! JSON for whatever front end renders it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, MemoryStandard};

// =============================================================================
// CONFIGURATION TYPES (loaded from TOML)
// =============================================================================

/// Root configuration loaded from compat_rules.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatRules {
    /// Estimated draw of everything the power budget does not model
    /// individually (motherboard, memory, storage, fans), in watts
    pub baseline_power_watts: u32,
    /// Memory requirements per processor socket family, first match wins
    #[serde(default)]
    pub memory_requirements: Vec<MemoryRequirement>,
}

/// How a processor socket family constrains installed memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemoryRequirement {
    /// Memory must match the standard the installed motherboard declares.
    FollowsMotherboard { socket_prefix: String },
    /// Memory must be one specific standard regardless of motherboard.
    Fixed {
        socket: String,
        standard: MemoryStandard,
    },
}

impl MemoryRequirement {
    pub fn applies_to(&self, socket: &str) -> bool {
        match self {
            MemoryRequirement::FollowsMotherboard { socket_prefix } => {
                socket.starts_with(socket_prefix.as_str())
            }
            MemoryRequirement::Fixed { socket: s, .. } => s == socket,
        }
    }
}

// =============================================================================
// OUTPUT TYPES (serialized to callers)
// =============================================================================

/// Which constraint a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Socket,
    MemoryStandard,
    FormFactor,
    GpuClearance,
    CoolerClearance,
    PowerBudget,
}

/// One unmet constraint between a candidate and the rest of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Shown to users verbatim
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Occupied categories with at least one violation.
pub type ViolationSet = BTreeMap<Category, Vec<String>>;

/// Price total and compatibility report for a whole build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub total_price: u64,
    pub violations: ViolationSet,
}

impl BuildSummary {
    pub fn is_compatible(&self) -> bool {
        self.violations.is_empty()
    }
}
