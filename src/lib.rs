pub mod build;
pub mod catalog;
pub mod compat;
mod error;

use std::path::PathBuf;

pub use build::{BuildStore, Configuration, SavedBuild, Suggestion};
pub use catalog::{query, CatalogQuery, Category, Component};
pub use compat::{evaluate, summarize, BuildSummary, CompatibilityEngine, Violation, ViolationKind};
pub use error::MobomojoError;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Where saved builds live by default: `<data dir>/mobomojo/builds.db`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("mobomojo").join("builds.db"))
}
