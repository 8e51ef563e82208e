//! The build being assembled, and its saved form.
//!
//! - `Configuration` - one component per category, owned by the caller
//! - `SavedBuild` - the persisted record: component ids, name, total, timestamp
//! - `BuildStore` - local SQLite persistence of saved builds
//! - `write_build_atomic` / `read_build` - single-record JSON files

mod configuration;
pub mod export;
mod saved;
pub mod store;
mod suggestions;

pub use configuration::Configuration;
pub use export::{read_build, write_build_atomic};
pub use saved::SavedBuild;
pub use store::BuildStore;
pub use suggestions::Suggestion;
