use crate::app::ports::TenderServicePort;
use crate::common::constants::{MSG_AREA_OPTIONS_FAILED, MSG_LOCAL_AREA_OPTIONS_FAILED};
use crate::common::error::Result;
use crate::common::types::{FieldName, FilterRequest, SelectOption, TenderRecord};
use crate::observability::metrics;
use crate::query::cascade::LocationQuery;
use crate::query::generation::GenerationCounter;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Which dependent dropdown an option set feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeLevel {
    Area,
    LocalArea,
}

impl ScopeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeLevel::Area => "area",
            ScopeLevel::LocalArea => "local_area",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            ScopeLevel::Area => MSG_AREA_OPTIONS_FAILED,
            ScopeLevel::LocalArea => MSG_LOCAL_AREA_OPTIONS_FAILED,
        }
    }
}

/// Upstream selections that determine one option universe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    Area { pincode: String },
    LocalArea { pincode: String, area: String },
}

impl ScopeKey {
    /// `None` when the selection this level depends on is missing
    pub fn for_level(level: ScopeLevel, query: &LocationQuery) -> Option<ScopeKey> {
        let pincode = query.postal_code();
        if pincode.is_empty() {
            return None;
        }
        match level {
            ScopeLevel::Area => Some(ScopeKey::Area { pincode: pincode.to_string() }),
            ScopeLevel::LocalArea => query.area().map(|area| ScopeKey::LocalArea {
                pincode: pincode.to_string(),
                area: area.value.clone(),
            }),
        }
    }

    pub fn level(&self) -> ScopeLevel {
        match self {
            ScopeKey::Area { .. } => ScopeLevel::Area,
            ScopeKey::LocalArea { .. } => ScopeLevel::LocalArea,
        }
    }

    pub fn pincode(&self) -> &str {
        match self {
            ScopeKey::Area { pincode } | ScopeKey::LocalArea { pincode, .. } => pincode,
        }
    }

    /// Distinct values of this scope's field, in first-seen order
    fn universe(&self, records: &[TenderRecord]) -> Vec<String> {
        let (field, parent_area) = match self {
            ScopeKey::Area { .. } => (FieldName::AreaName, None),
            ScopeKey::LocalArea { area, .. } => (FieldName::LocalAreaName, Some(area.as_str())),
        };

        let mut seen = HashSet::new();
        records
            .iter()
            .filter(|r| parent_area.map_or(true, |area| r.field_equals(FieldName::AreaName, area)))
            .filter_map(|r| r.text(field))
            .filter(|value| !value.trim().is_empty())
            .filter(|value| seen.insert(value.clone()))
            .collect()
    }
}

/// Result of one option lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionLoad {
    Ready(Vec<SelectOption>),
    /// A newer lookup for the same dropdown was issued; do not display
    Superseded,
}

impl OptionLoad {
    pub fn into_options(self) -> Vec<SelectOption> {
        match self {
            OptionLoad::Ready(options) => options,
            OptionLoad::Superseded => Vec::new(),
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, OptionLoad::Superseded)
    }
}

/// Failure surfaced for one dropdown level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedError {
    pub scope: ScopeKey,
    pub message: String,
}

#[derive(Default)]
struct CacheState {
    universes: HashMap<ScopeKey, Arc<Vec<String>>>,
    current_keys: HashMap<ScopeLevel, ScopeKey>,
    generations: GenerationCounter<ScopeLevel>,
    errors: HashMap<ScopeLevel, ScopedError>,
}

/// Memoizes dropdown option universes per scope key. Each dropdown level keeps
/// only the universe of its current key; moving to a new key evicts the old one.
pub struct OptionCache {
    service: Arc<dyn TenderServicePort>,
    state: Mutex<CacheState>,
    inflight: Mutex<HashMap<ScopeKey, Arc<Mutex<()>>>>,
}

impl OptionCache {
    pub fn new(service: Arc<dyn TenderServicePort>) -> Self {
        Self {
            service,
            state: Mutex::new(CacheState::default()),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Options for `level` under the current selections whose label contains
    /// `input` (case-insensitive). Never fails: upstream errors yield an empty
    /// list and are kept for [`OptionCache::last_error`].
    pub async fn load_options(
        &self,
        level: ScopeLevel,
        query: &LocationQuery,
        input: &str,
    ) -> OptionLoad {
        let key = ScopeKey::for_level(level, query);
        let generation = {
            let mut state = self.state.lock().await;
            let generation = state.generations.issue(level);
            match &key {
                Some(key) => {
                    if state.current_keys.get(&level) != Some(key) {
                        if let Some(old) = state.current_keys.insert(level, key.clone()) {
                            debug!(level = level.as_str(), ?old, "scope changed, evicting cached options");
                            state.universes.remove(&old);
                        }
                    }
                }
                None => {
                    if let Some(old) = state.current_keys.remove(&level) {
                        state.universes.remove(&old);
                    }
                    state.errors.remove(&level);
                }
            }
            generation
        };

        let Some(key) = key else {
            return OptionLoad::Ready(Vec::new());
        };

        let fetched = self.universe_for(&key).await;

        let mut state = self.state.lock().await;
        if !state.generations.is_current(&level, generation) {
            debug!(level = level.as_str(), "discarding superseded option lookup");
            metrics::session::superseded(level.as_str());
            return OptionLoad::Superseded;
        }

        match fetched {
            Ok(universe) => {
                state.errors.remove(&level);
                OptionLoad::Ready(filter_options(&universe, input))
            }
            Err(e) => {
                warn!(level = level.as_str(), pincode = key.pincode(), error = %e, "option lookup failed");
                metrics::option_cache::failure(level.as_str());
                state.errors.insert(
                    level,
                    ScopedError {
                        scope: key,
                        message: format!("{}: {}", level.failure_message(), e),
                    },
                );
                OptionLoad::Ready(Vec::new())
            }
        }
    }

    pub async fn last_error(&self, level: ScopeLevel) -> Option<ScopedError> {
        self.state.lock().await.errors.get(&level).cloned()
    }

    pub async fn is_cached(&self, key: &ScopeKey) -> bool {
        self.state.lock().await.universes.contains_key(key)
    }

    /// Fetches the universe for `key` at most once; concurrent callers for
    /// the same key wait on the first fetch.
    async fn universe_for(&self, key: &ScopeKey) -> Result<Arc<Vec<String>>> {
        if let Some(universe) = self.cached(key).await {
            metrics::option_cache::hit(key.level().as_str());
            return Ok(universe);
        }

        let gate = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(
                inflight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        let guard = gate.lock().await;
        let fetched = self.fetch_universe(key).await;

        {
            let mut inflight = self.inflight.lock().await;
            // only the map and this caller hold the gate: nobody is waiting
            if Arc::strong_count(&gate) == 2 {
                inflight.remove(key);
            }
        }
        drop(guard);
        fetched
    }

    async fn fetch_universe(&self, key: &ScopeKey) -> Result<Arc<Vec<String>>> {
        let level = key.level().as_str();
        if let Some(universe) = self.cached(key).await {
            metrics::option_cache::hit(level);
            return Ok(universe);
        }

        metrics::option_cache::miss(level);
        let records = self
            .service
            .filter_tenders(&FilterRequest::by_pincode(key.pincode()))
            .await?;
        let universe = Arc::new(key.universe(&records));
        debug!(level, pincode = key.pincode(), options = universe.len(), "loaded option universe");

        let mut state = self.state.lock().await;
        // A key that is no longer current must not repopulate the cache
        if state.current_keys.get(&key.level()) == Some(key) {
            state.universes.insert(key.clone(), universe.clone());
        }
        Ok(universe)
    }

    #[cfg(test)]
    async fn inflight_len(&self) -> usize {
        self.inflight.lock().await.len()
    }

    async fn cached(&self, key: &ScopeKey) -> Option<Arc<Vec<String>>> {
        self.state.lock().await.universes.get(key).cloned()
    }
}

fn filter_options(universe: &[String], input: &str) -> Vec<SelectOption> {
    let needle = input.trim().to_lowercase();
    universe
        .iter()
        .filter(|value| value.to_lowercase().contains(&needle))
        .map(|value| SelectOption::new(value.clone()))
        .collect()
}
