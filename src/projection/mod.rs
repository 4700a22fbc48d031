//! Ordered selection of output fields for a report.
//!
//! Every operation is a silent no-op when it refers to a field the installed
//! catalog does not know, and the visible id list always equals the internal
//! sequence.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Catalog, FieldId};

/// Whether a definition is being created or an existing one edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit,
}

/// The report's output columns, in order.
#[derive(Debug, Clone)]
pub struct FieldProjection {
    catalog: Arc<Catalog>,
    fields: Vec<FieldId>,
}

impl FieldProjection {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            fields: Vec::new(),
        }
    }

    /// Start from a persisted id list.
    ///
    /// Ids are taken as-is; the invalidation pass drops unknown ones.
    pub fn with_fields(catalog: Arc<Catalog>, fields: Vec<FieldId>) -> Self {
        let mut projection = Self::new(catalog);
        for id in fields {
            if !projection.fields.contains(&id) {
                projection.fields.push(id);
            }
        }
        projection
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Install the catalog of a newly selected data source.
    ///
    /// A new definition starts over with an empty projection when the data
    /// source actually changes. An existing one keeps its entries so an
    /// accidental re-selection loses nothing; stale ids are left for the
    /// invalidation pass.
    pub fn set_data_source(&mut self, catalog: Arc<Catalog>, mode: EditMode) {
        let switched = catalog.data_source_id() != self.catalog.data_source_id();
        if mode == EditMode::Create && switched {
            debug!(data_source_id = ?catalog.data_source_id(), "resetting projection");
            self.fields.clear();
        }
        self.catalog = catalog;
    }

    /// Append a field unless it is already present or unknown.
    pub fn add_field(&mut self, id: FieldId) -> bool {
        if !self.catalog.contains(id) || self.fields.contains(&id) {
            return false;
        }
        self.fields.push(id);
        true
    }

    /// Remove a field, keeping the order of the rest.
    pub fn remove_field(&mut self, id: FieldId) -> bool {
        let Some(index) = self.fields.iter().position(|&f| f == id) else {
            return false;
        };
        self.fields.remove(index);
        true
    }

    /// Move the entry at `from` to position `to`, shifting the ones between.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.fields.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }
        let id = self.fields.remove(from);
        self.fields.insert(to, id);
        true
    }

    /// Drop every entry the predicate rejects. Returns the dropped ids.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(FieldId) -> bool) -> Vec<FieldId> {
        let mut dropped = Vec::new();
        self.fields.retain(|&id| {
            let kept = keep(id);
            if !kept {
                dropped.push(id);
            }
            kept
        });
        dropped
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.fields.contains(&id)
    }

    /// The ordered id list exposed to collaborators.
    pub fn field_ids(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Persisted form: ids joined by commas.
    pub fn to_delimited(&self) -> String {
        join_field_ids(&self.fields)
    }
}

/// Join field ids with the persisted delimiter.
pub fn join_field_ids(ids: &[FieldId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split a persisted id list. Blank segments are skipped; unparseable
/// segments are returned separately.
pub fn split_field_ids(raw: &str) -> (Vec<FieldId>, Vec<String>) {
    let mut ids = Vec::new();
    let mut rejected = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<u64>() {
            Ok(id) => ids.push(FieldId(id)),
            Err(_) => rejected.push(part.to_string()),
        }
    }
    (ids, rejected)
}
