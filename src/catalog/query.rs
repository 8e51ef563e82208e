//! Catalog search, filtering, sorting and facets.
//!
//! Queries never consult the compatibility engine: incompatible parts stay
//! in the result and are marked by the caller.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::source::CatalogSource;
use super::types::{Category, Component, SpecValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Price,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortDirective {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortDirective {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

/// A catalog listing request for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub category: Category,
    /// Case-insensitive substring over component names. Empty means no search.
    #[serde(default)]
    pub search_term: String,
    /// Spec attribute key -> wanted value. Empty values are ignored.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub sort: SortDirective,
}

impl CatalogQuery {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            search_term: String::new(),
            filters: BTreeMap::new(),
            sort: SortDirective::default(),
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn filter(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(attribute.into(), value.into());
        self
    }

    pub fn sort_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = SortDirective::new(key, order);
        self
    }
}

/// Run a query against a catalog.
///
/// Filters apply first, then the search term, then a stable sort so equal
/// keys keep catalog order.
pub fn query<'a, C>(catalog: &'a C, request: &CatalogQuery) -> Vec<&'a Component>
where
    C: CatalogSource + ?Sized,
{
    let needle = request.search_term.to_lowercase();

    let mut matches: Vec<&Component> = catalog
        .of_category(request.category)
        .into_iter()
        .filter(|c| {
            request
                .filters
                .iter()
                .filter(|(_, wanted)| !wanted.is_empty())
                .all(|(attribute, wanted)| {
                    c.spec_value(attribute)
                        .is_some_and(|value| value.matches(wanted))
                })
        })
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .collect();

    matches.sort_by(|a, b| {
        let ordering = compare(a, b, request.sort.key);
        match request.sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    matches
}

fn compare(a: &Component, b: &Component, key: SortKey) -> Ordering {
    match key {
        SortKey::Price => a.price.cmp(&b.price),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

/// Spec attributes offered as filters for each category.
pub fn filterable_attributes(category: Category) -> &'static [&'static str] {
    match category {
        Category::Cpu => &["socket"],
        Category::Motherboard => &["socket", "formFactor", "memoryType"],
        Category::Ram => &["ramType", "speed", "size"],
        Category::Case => &["supportedFormFactors"],
        Category::Psu => &["efficiency"],
        Category::Gpu | Category::Storage | Category::Cooler => &[],
    }
}

/// Distinct, sorted values present in the catalog for each filterable
/// attribute of the category. List attributes contribute every member.
pub fn available_filters<C>(catalog: &C, category: Category) -> BTreeMap<String, Vec<String>>
where
    C: CatalogSource + ?Sized,
{
    let attributes = filterable_attributes(category);
    let mut options: BTreeMap<String, BTreeSet<String>> = attributes
        .iter()
        .map(|a| (a.to_string(), BTreeSet::new()))
        .collect();

    for component in catalog.of_category(category) {
        for attribute in attributes {
            let values = match component.spec_value(attribute) {
                Some(SpecValue::Scalar(v)) => vec![v],
                Some(SpecValue::List(items)) => items,
                None => continue,
            };
            if let Some(set) = options.get_mut(*attribute) {
                set.extend(values.into_iter().filter(|v| !v.is_empty()));
            }
        }
    }

    options
        .into_iter()
        .map(|(attribute, values)| (attribute, values.into_iter().collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{CpuSpecs, Specs};

    fn cpu(id: &str, name: &str, price: u64, socket: &str) -> Component {
        Component {
            id: id.to_string(),
            name: name.to_string(),
            price,
            image_url: String::new(),
            specs: Specs::Cpu(CpuSpecs {
                socket: Some(socket.to_string()),
                ..Default::default()
            }),
        }
    }

    fn catalog() -> Vec<Component> {
        vec![
            cpu("c1", "AMD Ryzen 7 7800X3D", 2_400_000, "AM5"),
            cpu("c2", "Intel Core i5-13600K", 1_800_000, "LGA1700"),
            cpu("c3", "AMD Ryzen 5 5600", 700_000, "AM4"),
            cpu("c4", "amd ryzen 5 7600", 1_800_000, "AM5"),
        ]
    }

    fn ids(found: &[&Component]) -> Vec<String> {
        found.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_default_sort_is_price_ascending_and_stable() {
        let catalog = catalog();
        let found = query(&catalog, &CatalogQuery::new(Category::Cpu));
        assert_eq!(ids(&found), vec!["c3", "c2", "c4", "c1"]);
    }

    #[test]
    fn test_descending_keeps_catalog_order_for_ties() {
        let catalog = catalog();
        let request =
            CatalogQuery::new(Category::Cpu).sort_by(SortKey::Price, SortOrder::Desc);
        let found = query(&catalog, &request);
        assert_eq!(ids(&found), vec!["c1", "c2", "c4", "c3"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let catalog = catalog();
        let request = CatalogQuery::new(Category::Cpu).sort_by(SortKey::Name, SortOrder::Asc);
        let found = query(&catalog, &request);
        assert_eq!(ids(&found), vec!["c3", "c4", "c1", "c2"]);
    }

    #[test]
    fn test_search_and_filter_combine() {
        let catalog = catalog();
        let request = CatalogQuery::new(Category::Cpu)
            .search("RYZEN")
            .filter("socket", "AM5");
        let found = query(&catalog, &request);
        assert_eq!(ids(&found), vec!["c4", "c1"]);
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let catalog = catalog();
        let found = query(&catalog, &CatalogQuery::new(Category::Cpu).search("i5 "));
        assert!(found.is_empty());

        let found = query(&catalog, &CatalogQuery::new(Category::Cpu).search("i5-"));
        assert_eq!(ids(&found), vec!["c2"]);

        let found = query(&catalog, &CatalogQuery::new(Category::Cpu).search(" 5 "));
        assert_eq!(ids(&found), vec!["c3", "c4"]);
    }

    #[test]
    fn test_empty_filter_value_is_ignored() {
        let catalog = catalog();
        let request = CatalogQuery::new(Category::Cpu).filter("socket", "");
        assert_eq!(query(&catalog, &request).len(), 4);
    }

    #[test]
    fn test_unknown_attribute_never_matches() {
        let catalog = catalog();
        let request = CatalogQuery::new(Category::Cpu).filter("wattage", "650");
        assert!(query(&catalog, &request).is_empty());
    }

    #[test]
    fn test_other_categories_excluded() {
        let catalog = catalog();
        assert!(query(&catalog, &CatalogQuery::new(Category::Gpu)).is_empty());
    }

    #[test]
    fn test_available_filters_sorted_distinct() {
        let catalog = catalog();
        let facets = available_filters(&catalog, Category::Cpu);
        assert_eq!(facets.len(), 1);
        assert_eq!(facets["socket"], vec!["AM4", "AM5", "LGA1700"]);

        assert!(available_filters(&catalog, Category::Cooler).is_empty());
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let request: CatalogQuery =
            serde_json::from_str(r#"{"category": "RAM", "searchTerm": "corsair"}"#).unwrap();
        assert_eq!(request.category, Category::Ram);
        assert_eq!(request.sort, SortDirective::default());
        assert!(request.filters.is_empty());
    }
}
