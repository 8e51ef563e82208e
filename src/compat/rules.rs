//! TOML rule loading for the compatibility engine.
//!
//! Provides two loading methods:
//! - `default_rules()` - Loads embedded rules compiled into the binary
//! - `load_rules(path)` - Loads custom rules from a file path

use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::types::CompatRules;

/// Default rules embedded in the binary at compile time.
/// These are loaded from `config/compat_rules.toml`.
const DEFAULT_RULES: &str = include_str!("../../config/compat_rules.toml");

/// Load rules from a TOML file at the given path.
///
/// # Example
/// ```ignore
/// let rules = load_rules(Path::new("/path/to/compat_rules.toml"))?;
/// ```
pub fn load_rules(path: &Path) -> Result<CompatRules> {
    let content = std::fs::read_to_string(path)?;
    let config: CompatRules = toml::from_str(&content)?;
    info!(
        "Loaded compatibility rules from {:?} ({} memory requirements)",
        path,
        config.memory_requirements.len()
    );
    Ok(config)
}

/// Get the default rules embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (this would be a compile-time bug).
pub fn default_rules() -> CompatRules {
    toml::from_str(DEFAULT_RULES).expect("embedded compat_rules.toml must be valid TOML")
}
