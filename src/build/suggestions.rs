use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::configuration::Configuration;
use crate::catalog::{CatalogSource, Category};

/// A structured part pick from an external recommender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub category: Category,
    pub name: String,
}

impl Configuration {
    /// Apply recommender picks, resolved by exact name within the category.
    ///
    /// A single suggestion only fills an empty slot. A batch of several is
    /// treated as a full-build proposal and may replace occupants. Returns
    /// how many suggestions were applied.
    pub fn apply_suggestions<C>(&mut self, suggestions: &[Suggestion], catalog: &C) -> usize
    where
        C: CatalogSource + ?Sized,
    {
        let full_build = suggestions.len() > 1;
        let mut applied = 0;

        for suggestion in suggestions {
            if self.get(suggestion.category).is_some() && !full_build {
                continue;
            }

            let Some(component) = catalog.find_by_name(suggestion.category, &suggestion.name)
            else {
                warn!(
                    "Suggested {} '{}' is not in the catalog",
                    suggestion.category, suggestion.name
                );
                continue;
            };

            // find_by_name only returns components of the requested category
            if self.set(component.clone()).is_ok() {
                applied += 1;
            }
        }

        info!("Applied {} of {} suggestions", applied, suggestions.len());
        applied
    }
}
