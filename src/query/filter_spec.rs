use crate::common::constants::MAX_FILTER_COLUMNS;
use crate::common::types::{FieldName, FilterRequest};
use tracing::debug;

/// What the user has chosen to search and display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub search_by: Option<FieldName>,
    pub search_term: String,
    /// Selection order, never more than [`MAX_FILTER_COLUMNS`]
    pub columns: Vec<FieldName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnToggle {
    Added,
    Removed,
    /// Already at the column cap; nothing changed
    Refused,
}

#[derive(Debug, Clone, Default)]
pub struct FilterSpecBuilder {
    spec: FilterSpec,
}

impl FilterSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn columns(&self) -> &[FieldName] {
        &self.spec.columns
    }

    pub fn set_search_by(&mut self, field: Option<FieldName>) {
        self.spec.search_by = field;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.spec.search_term = term.into();
    }

    pub fn toggle_column(&mut self, name: FieldName) -> ColumnToggle {
        if let Some(pos) = self.spec.columns.iter().position(|c| *c == name) {
            self.spec.columns.remove(pos);
            ColumnToggle::Removed
        } else if self.spec.columns.len() < MAX_FILTER_COLUMNS {
            self.spec.columns.push(name);
            ColumnToggle::Added
        } else {
            debug!(column = %name, "column cap reached, ignoring toggle");
            ColumnToggle::Refused
        }
    }

    /// The filter body exactly as selected; blank search fields are forwarded
    pub fn build_request(&self) -> FilterRequest {
        FilterRequest {
            search_by: self
                .spec
                .search_by
                .map(|f| f.as_str().to_string())
                .unwrap_or_default(),
            search_term: self.spec.search_term.clone(),
            filter_columns: self.spec.columns.clone(),
        }
    }
}
