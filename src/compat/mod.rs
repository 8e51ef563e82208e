//! Build compatibility engine.
//!
//! This module decides whether a candidate component can coexist with the
//! parts already chosen for a build, and aggregates a whole build into a
//! price total plus per-slot violations.
//!
//! # Architecture
//!
//! - **Rules**: Constants loaded from TOML config (or embedded defaults)
//! - **Evaluation**: Candidate + build -> ordered violation messages
//! - **Summary**: Build -> total price + violations per occupied slot
//!
//! # Example
//!
//! ```ignore
//! use mobomojo::catalog::{default_catalog, CatalogSource};
//! use mobomojo::compat::CompatibilityEngine;
//! use mobomojo::Configuration;
//!
//! let catalog = default_catalog();
//! let engine = CompatibilityEngine::default();
//!
//! let mut build = Configuration::new();
//! build.set(catalog.find("mb-b650-tuf").unwrap().clone())?;
//!
//! for issue in engine.evaluate(catalog.find("cpu-5600").unwrap(), &build) {
//!     println!("{}", issue);
//! }
//!
//! let summary = engine.summarize(&build);
//! println!("Total: {}", summary.total_price);
//! ```

mod engine;
mod rules;
mod types;

use std::sync::OnceLock;

pub use engine::CompatibilityEngine;
pub use rules::{default_rules, load_rules};
pub use types::*;

use crate::build::Configuration;
use crate::catalog::Component;

fn default_engine() -> &'static CompatibilityEngine {
    static ENGINE: OnceLock<CompatibilityEngine> = OnceLock::new();
    ENGINE.get_or_init(CompatibilityEngine::default)
}

/// Evaluate a candidate with the default rules.
pub fn evaluate(candidate: &Component, build: &Configuration) -> Vec<String> {
    default_engine().evaluate(candidate, build)
}

/// Summarize a build with the default rules.
pub fn summarize(build: &Configuration) -> BuildSummary {
    default_engine().summarize(build)
}
