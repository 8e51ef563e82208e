use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::configuration::Configuration;
use crate::catalog::{CatalogSource, Category};
use crate::error::MobomojoError;

/// A named build snapshot in the persisted-build format.
///
/// Only component ids are stored; the catalog resolves them on restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBuild {
    /// Assigned by the store that persists the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub build_name: String,
    pub components: BTreeMap<Category, String>,
    pub total_price: u64,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl SavedBuild {
    /// Snapshot a build under a name, stamped with the current time.
    pub fn from_configuration(name: &str, build: &Configuration) -> Result<Self, MobomojoError> {
        let saved = SavedBuild {
            id: None,
            build_name: name.trim().to_string(),
            components: build.component_ids(),
            total_price: build.total_price(),
            created_at: Utc::now().to_rfc3339(),
        };
        saved.validate()?;
        Ok(saved)
    }

    /// A build needs a name and at least one component to be saved.
    pub fn validate(&self) -> Result<(), MobomojoError> {
        if self.build_name.trim().is_empty() {
            return Err(MobomojoError::InvalidBuild(
                "build name must not be blank".to_string(),
            ));
        }
        if self.components.is_empty() {
            return Err(MobomojoError::InvalidBuild(
                "build has no components".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the stored ids back into a build.
    pub fn restore<C>(&self, catalog: &C) -> Result<Configuration, MobomojoError>
    where
        C: CatalogSource + ?Sized,
    {
        Configuration::from_ids(&self.components, catalog)
    }
}
