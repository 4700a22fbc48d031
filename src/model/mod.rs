//! Report type definitions and their storage.

pub mod definition;
mod store;

pub use definition::{
    DefinitionError, DefinitionId, DefinitionRecord, ReportTypeDefinition, FILTER_CONFIG_KEY,
};
pub use store::{DefinitionStore, ExecutorDefinitionStore};
