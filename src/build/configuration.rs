use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{
    CaseSpecs, CatalogSource, Category, Component, CoolerSpecs, CpuSpecs, GpuSpecs,
    MotherboardSpecs, PsuSpecs, RamSpecs, Specs,
};
use crate::error::MobomojoError;

/// A build under construction: at most one component per category.
///
/// Callers own the value and pass it into every engine call; nothing in the
/// crate keeps a reference to it between calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Category, Component>", into = "BTreeMap<Category, Component>")]
pub struct Configuration {
    slots: BTreeMap<Category, Component>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a component in its category's slot, returning the previous
    /// occupant.
    pub fn set(&mut self, component: Component) -> Result<Option<Component>, MobomojoError> {
        let category = component
            .category()
            .ok_or_else(|| MobomojoError::Unplaceable(component.id.clone()))?;
        debug!("Setting {} slot to {}", category, component.id);
        Ok(self.slots.insert(category, component))
    }

    pub fn clear(&mut self, category: Category) -> Option<Component> {
        let removed = self.slots.remove(&category);
        if let Some(component) = &removed {
            debug!("Cleared {} slot (was {})", category, component.id);
        }
        removed
    }

    pub fn clear_all(&mut self) {
        debug!("Clearing all {} occupied slots", self.slots.len());
        self.slots.clear();
    }

    pub fn get(&self, category: Category) -> Option<&Component> {
        self.slots.get(&category)
    }

    /// Occupied slots in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &Component)> {
        self.slots.iter().map(|(category, component)| (*category, component))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// A copy of this build with one slot emptied.
    pub fn without(&self, category: Category) -> Configuration {
        let mut rest = self.clone();
        rest.slots.remove(&category);
        rest
    }

    /// Sum of occupant prices, saturating at `u64::MAX`.
    pub fn total_price(&self) -> u64 {
        self.slots
            .values()
            .fold(0u64, |total, c| total.saturating_add(c.price))
    }

    /// Category -> component id for every occupied slot.
    pub fn component_ids(&self) -> BTreeMap<Category, String> {
        self.slots
            .iter()
            .map(|(category, component)| (*category, component.id.clone()))
            .collect()
    }

    /// Rebuild a configuration from category -> component id pairs.
    pub fn from_ids<C>(ids: &BTreeMap<Category, String>, catalog: &C) -> Result<Self, MobomojoError>
    where
        C: CatalogSource + ?Sized,
    {
        let mut build = Configuration::new();
        for (category, id) in ids {
            let component = catalog
                .find(id)
                .ok_or_else(|| MobomojoError::UnknownComponent(id.clone()))?;
            if component.category() != Some(*category) {
                return Err(MobomojoError::InvalidBuild(format!(
                    "component '{}' is not a {}",
                    id, category
                )));
            }
            build.set(component.clone())?;
        }
        Ok(build)
    }

    // Typed slot access. `set` files every component under its own category,
    // so a slot's specs always match the slot.

    pub fn cpu(&self) -> Option<(&Component, &CpuSpecs)> {
        match self.get(Category::Cpu) {
            Some(c @ Component { specs: Specs::Cpu(s), .. }) => Some((c, s)),
            _ => None,
        }
    }

    pub fn motherboard(&self) -> Option<(&Component, &MotherboardSpecs)> {
        match self.get(Category::Motherboard) {
            Some(c @ Component { specs: Specs::Motherboard(s), .. }) => Some((c, s)),
            _ => None,
        }
    }

    pub fn ram(&self) -> Option<(&Component, &RamSpecs)> {
        match self.get(Category::Ram) {
            Some(c @ Component { specs: Specs::Ram(s), .. }) => Some((c, s)),
            _ => None,
        }
    }

    pub fn gpu(&self) -> Option<(&Component, &GpuSpecs)> {
        match self.get(Category::Gpu) {
            Some(c @ Component { specs: Specs::Gpu(s), .. }) => Some((c, s)),
            _ => None,
        }
    }

    pub fn psu(&self) -> Option<(&Component, &PsuSpecs)> {
        match self.get(Category::Psu) {
            Some(c @ Component { specs: Specs::Psu(s), .. }) => Some((c, s)),
            _ => None,
        }
    }

    pub fn case(&self) -> Option<(&Component, &CaseSpecs)> {
        match self.get(Category::Case) {
            Some(c @ Component { specs: Specs::Case(s), .. }) => Some((c, s)),
            _ => None,
        }
    }

    pub fn cooler(&self) -> Option<(&Component, &CoolerSpecs)> {
        match self.get(Category::Cooler) {
            Some(c @ Component { specs: Specs::Cooler(s), .. }) => Some((c, s)),
            _ => None,
        }
    }
}

impl TryFrom<BTreeMap<Category, Component>> for Configuration {
    type Error = MobomojoError;

    fn try_from(slots: BTreeMap<Category, Component>) -> Result<Self, Self::Error> {
        if let Some((category, component)) = slots
            .iter()
            .find(|(category, component)| component.category() != Some(**category))
        {
            return Err(MobomojoError::InvalidBuild(format!(
                "component '{}' cannot occupy the {} slot",
                component.id, category
            )));
        }
        Ok(Self { slots })
    }
}

impl From<Configuration> for BTreeMap<Category, Component> {
    fn from(build: Configuration) -> Self {
        build.slots
    }
}
