//! Postal code → area → local area narrowing.
//!
//! The selection lives in one [`LocationQuery`] value that only changes via
//! [`LocationQuery::apply`], which enforces the invalidation rules: a new
//! postal code clears both dependent selections and a new area clears the
//! local area.

use crate::app::ports::TenderServicePort;
use crate::common::constants::{
    ACCEPTED_STATUS, MSG_ALL_FIELDS_REQUIRED, MSG_AREA_NEEDS_PINCODE, MSG_LOCAL_AREA_NEEDS_AREA,
};
use crate::common::error::{Result, TenderError};
use crate::common::types::{FieldName, FilterRequest, SelectOption, TenderRecord};
use crate::query::option_cache::{OptionCache, OptionLoad, ScopeLevel};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    PostalOnly,
    AreaSelected,
    LocalAreaSelected,
}

/// One user edit of the location selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationEdit {
    PostalCode(String),
    Area(SelectOption),
    LocalArea(SelectOption),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationQuery {
    postal_code: String,
    area: Option<SelectOption>,
    local_area: Option<SelectOption>,
}

impl LocationQuery {
    /// The single transition function for the selection
    pub fn apply(&self, edit: LocationEdit) -> Result<LocationQuery> {
        match edit {
            LocationEdit::PostalCode(code) => Ok(Self::with_postal_code(&code)),
            LocationEdit::Area(option) => {
                if self.postal_code.is_empty() {
                    return Err(TenderError::validation(MSG_AREA_NEEDS_PINCODE));
                }
                Ok(LocationQuery {
                    postal_code: self.postal_code.clone(),
                    area: Some(option),
                    local_area: None,
                })
            }
            LocationEdit::LocalArea(option) => {
                if self.area.is_none() {
                    return Err(TenderError::validation(MSG_LOCAL_AREA_NEEDS_AREA));
                }
                Ok(LocationQuery {
                    local_area: Some(option),
                    ..self.clone()
                })
            }
        }
    }

    /// A new postal code always applies and clears both dependent selections
    pub fn with_postal_code(code: &str) -> LocationQuery {
        LocationQuery {
            postal_code: code.trim().to_string(),
            area: None,
            local_area: None,
        }
    }

    pub fn state(&self) -> SelectionState {
        match (&self.area, &self.local_area) {
            (Some(_), Some(_)) => SelectionState::LocalAreaSelected,
            (Some(_), None) => SelectionState::AreaSelected,
            _ if !self.postal_code.is_empty() => SelectionState::PostalOnly,
            _ => SelectionState::Empty,
        }
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn area(&self) -> Option<&SelectOption> {
        self.area.as_ref()
    }

    pub fn local_area(&self) -> Option<&SelectOption> {
        self.local_area.as_ref()
    }
}

/// A validated search over a complete location selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSearch {
    pub pincode: String,
    pub area: String,
    pub local_area: String,
}

impl LocationSearch {
    /// Client-side conjunctive filter applied to the pincode-narrowed records
    pub fn matches(&self, record: &TenderRecord) -> bool {
        record.field_equals(FieldName::AreaName, &self.area)
            && record.field_equals(FieldName::LocalAreaName, &self.local_area)
            && record.field_equals(FieldName::CancelAcceptTenders, ACCEPTED_STATUS)
    }

    #[instrument(skip(self, service), fields(pincode = %self.pincode, area = %self.area, local_area = %self.local_area))]
    pub async fn run(&self, service: &dyn TenderServicePort) -> Result<Vec<TenderRecord>> {
        let records = service
            .filter_tenders(&FilterRequest::by_pincode(&self.pincode))
            .await?;
        let fetched = records.len();
        let matched: Vec<TenderRecord> = records.into_iter().filter(|r| self.matches(r)).collect();
        info!(fetched, matched = matched.len(), "location search complete");
        Ok(matched)
    }
}

/// Detached option lookup for one dropdown under a snapshot of the selection
pub struct OptionsRequest {
    cache: Arc<OptionCache>,
    query: LocationQuery,
    level: ScopeLevel,
}

impl OptionsRequest {
    pub async fn load(self, input: &str) -> OptionLoad {
        self.cache.load_options(self.level, &self.query, input).await
    }
}

pub struct CascadingSelector {
    query: LocationQuery,
    options: Arc<OptionCache>,
    service: Arc<dyn TenderServicePort>,
}

impl CascadingSelector {
    pub fn new(service: Arc<dyn TenderServicePort>) -> Self {
        let options = Arc::new(OptionCache::new(service.clone()));
        Self::with_cache(service, options)
    }

    pub fn with_cache(service: Arc<dyn TenderServicePort>, options: Arc<OptionCache>) -> Self {
        Self {
            query: LocationQuery::default(),
            options,
            service,
        }
    }

    pub fn query(&self) -> &LocationQuery {
        &self.query
    }

    pub fn state(&self) -> SelectionState {
        self.query.state()
    }

    pub fn can_search(&self) -> bool {
        self.state() == SelectionState::LocalAreaSelected
    }

    pub fn option_cache(&self) -> &Arc<OptionCache> {
        &self.options
    }

    pub fn set_postal_code(&mut self, code: &str) {
        self.replace(LocationQuery::with_postal_code(code));
    }

    pub fn set_area(&mut self, option: SelectOption) -> Result<()> {
        self.transition(LocationEdit::Area(option))
    }

    pub fn set_local_area(&mut self, option: SelectOption) -> Result<()> {
        self.transition(LocationEdit::LocalArea(option))
    }

    fn transition(&mut self, edit: LocationEdit) -> Result<()> {
        let next = self.query.apply(edit)?;
        self.replace(next);
        Ok(())
    }

    fn replace(&mut self, next: LocationQuery) {
        debug!(from = ?self.query.state(), to = ?next.state(), "location selection changed");
        self.query = next;
    }

    pub fn options_for(&self, level: ScopeLevel) -> OptionsRequest {
        OptionsRequest {
            cache: self.options.clone(),
            query: self.query.clone(),
            level,
        }
    }

    pub async fn area_options(&self, input: &str) -> OptionLoad {
        self.options_for(ScopeLevel::Area).load(input).await
    }

    pub async fn local_area_options(&self, input: &str) -> OptionLoad {
        self.options_for(ScopeLevel::LocalArea).load(input).await
    }

    /// Validates the selection without touching the network
    pub fn search_request(&self) -> Result<LocationSearch> {
        match (&self.query.area, &self.query.local_area) {
            (Some(area), Some(local_area)) if !self.query.postal_code.is_empty() => Ok(LocationSearch {
                pincode: self.query.postal_code.clone(),
                area: area.value.clone(),
                local_area: local_area.value.clone(),
            }),
            _ => Err(TenderError::validation(MSG_ALL_FIELDS_REQUIRED)),
        }
    }

    pub async fn submit_search(&self) -> Result<Vec<TenderRecord>> {
        let search = self.search_request()?;
        search.run(self.service.as_ref()).await
    }
}
