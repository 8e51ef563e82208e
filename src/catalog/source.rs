//! Catalog storage and loading.
//!
//! The engine never owns a catalog; callers hand one in through
//! [`CatalogSource`], so tests can run against a plain `Vec<Component>`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use super::types::{Category, Component};
use crate::error::MobomojoError;

/// Default catalog embedded in the binary at compile time.
const DEFAULT_CATALOG: &str = include_str!("../../config/catalog.json");

/// Read-only, ordered access to catalog components.
pub trait CatalogSource {
    /// All components in catalog order.
    fn components(&self) -> &[Component];

    /// Components of one category, catalog order preserved.
    fn of_category(&self, category: Category) -> Vec<&Component> {
        self.components()
            .iter()
            .filter(|c| c.category() == Some(category))
            .collect()
    }

    fn find(&self, id: &str) -> Option<&Component> {
        self.components().iter().find(|c| c.id == id)
    }

    /// Exact name match within a category.
    fn find_by_name(&self, category: Category, name: &str) -> Option<&Component> {
        self.components()
            .iter()
            .find(|c| c.category() == Some(category) && c.name == name)
    }
}

impl CatalogSource for [Component] {
    fn components(&self) -> &[Component] {
        self
    }
}

impl CatalogSource for Vec<Component> {
    fn components(&self) -> &[Component] {
        self
    }
}

/// An immutable, loaded component catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: Vec<Component>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(components: Vec<Component>) -> Result<Self, MobomojoError> {
        let mut seen = HashSet::new();
        for component in &components {
            if !seen.insert(component.id.as_str()) {
                return Err(MobomojoError::Catalog(format!(
                    "duplicate component id '{}'",
                    component.id
                )));
            }
        }

        let unclassified = components.iter().filter(|c| c.category().is_none()).count();
        if unclassified > 0 {
            warn!(
                "Catalog has {} components outside the known categories",
                unclassified
            );
        }

        Ok(Self { components })
    }

    /// Parse a catalog from a JSON array of component records.
    pub fn from_json(json: &str) -> Result<Self> {
        let components: Vec<Component> = serde_json::from_str(json)?;
        let catalog = Self::new(components)?;
        debug!("Parsed catalog with {} components", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl CatalogSource for Catalog {
    fn components(&self) -> &[Component] {
        &self.components
    }
}

/// Load a catalog from a JSON file at the given path.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)?;
    let catalog = Catalog::from_json(&content)?;
    info!("Loaded {} components from {:?}", catalog.len(), path);
    Ok(catalog)
}

/// Get the default catalog embedded in the binary.
///
/// # Panics
/// Panics if the embedded JSON is invalid (this would be a compile-time bug).
pub fn default_catalog() -> Catalog {
    Catalog::from_json(DEFAULT_CATALOG).expect("embedded catalog.json must be a valid catalog")
}
