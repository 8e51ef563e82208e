//! Component catalog: typed records, loading, and the query layer.

pub mod query;
mod source;
mod types;

pub use query::{available_filters, filterable_attributes, query, CatalogQuery, SortDirective, SortKey, SortOrder};
pub use source::{default_catalog, load_catalog, Catalog, CatalogSource};
pub use types::*;
