//! Field catalog module.
//!
//! A catalog is the list of fields a data source exposes: name, labels,
//! declared type and the filterable/sortable/visible flags. The executor
//! owns the data; this module only fetches and indexes it.
//!
//! # Example
//!
//! ```ignore
//! use quill::catalog::{Catalog, CatalogProvider, DataSourceId, ExecutorCatalogProvider};
//!
//! let provider = ExecutorCatalogProvider::new(client);
//! let fields = provider.fields(DataSourceId(3)).await?;
//! let catalog = Catalog::new(DataSourceId(3), fields);
//! for field in catalog.filterable_fields() {
//!     println!("{} ({})", field.display_name(), field.data_type);
//! }
//! ```

mod executor_provider;
mod provider;
mod types;

pub use executor_provider::ExecutorCatalogProvider;
pub use provider::{CatalogProvider, CatalogResult};
pub use types::{Catalog, DataSourceId, DataType, Field, FieldId};
