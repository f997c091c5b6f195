use crate::app::ports::TenderServicePort;
use crate::clash::{ClashResult, ConflictProcessor};
use crate::common::constants::{
    MSG_CLASHES_FAILED, MSG_FILTER_FAILED, MSG_LOAD_FAILED, MSG_SEARCH_FAILED,
};
use crate::common::error::Result;
use crate::common::types::{FieldName, SelectOption, TenderRecord};
use crate::observability::metrics;
use crate::query::{
    CascadingSelector, ColumnToggle, FilterSpec, FilterSpecBuilder, Generation, GenerationCounter,
    LocationQuery, OptionLoad, ResultPager, ScopeLevel, ScopedError,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Session state whose updates are guarded by request generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionScope {
    Records,
    Clashes,
}

impl SessionScope {
    fn as_str(&self) -> &'static str {
        match self {
            SessionScope::Records => "records",
            SessionScope::Clashes => "clashes",
        }
    }
}

/// What happened to the session after a fetch completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The response became the visible state
    Applied,
    /// A newer request for the same scope was issued while this one ran
    Superseded,
}

/// The visible page of tenders
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub records: Vec<TenderRecord>,
}

struct SessionState {
    selector: CascadingSelector,
    filter: FilterSpecBuilder,
    pager: ResultPager,
    clash_result: Option<ClashResult>,
    error: Option<String>,
    generations: GenerationCounter<SessionScope>,
}

/// One search session against the tender service.
///
/// Every operation takes `&self`, so several may be in flight at once; a
/// response only replaces visible state while it belongs to the most recently
/// issued request for its scope. Failures are converted into a user-facing
/// message and returned to the caller as well.
pub struct TenderDashboard {
    service: Arc<dyn TenderServicePort>,
    clashes: ConflictProcessor,
    state: Mutex<SessionState>,
}

impl TenderDashboard {
    pub fn new(service: Arc<dyn TenderServicePort>) -> Self {
        Self {
            clashes: ConflictProcessor::new(service.clone()),
            state: Mutex::new(SessionState {
                selector: CascadingSelector::new(service.clone()),
                filter: FilterSpecBuilder::new(),
                pager: ResultPager::new(),
                clash_result: None,
                error: None,
                generations: GenerationCounter::new(),
            }),
            service,
        }
    }

    // ---- tender list -------------------------------------------------------

    /// Initial unfiltered load
    pub async fn load_all_tenders(&self) -> Result<Refresh> {
        let generation = self.state.lock().await.generations.issue(SessionScope::Records);
        let fetched = self.service.list_tenders().await;
        self.apply_records(generation, fetched, MSG_LOAD_FAILED).await
    }

    pub async fn set_search_by(&self, field: Option<FieldName>) {
        self.state.lock().await.filter.set_search_by(field);
    }

    pub async fn set_search_term(&self, term: &str) {
        self.state.lock().await.filter.set_search_term(term);
    }

    pub async fn toggle_column(&self, column: FieldName) -> ColumnToggle {
        self.state.lock().await.filter.toggle_column(column)
    }

    pub async fn filter_spec(&self) -> FilterSpec {
        self.state.lock().await.filter.spec().clone()
    }

    pub async fn search_and_filter(&self) -> Result<Refresh> {
        let (generation, request) = {
            let mut state = self.state.lock().await;
            (
                state.generations.issue(SessionScope::Records),
                state.filter.build_request(),
            )
        };
        debug!(search_by = %request.search_by, columns = request.filter_columns.len(), "filtering tenders");
        let fetched = self.service.filter_tenders(&request).await;
        self.apply_records(generation, fetched, MSG_FILTER_FAILED).await
    }

    // ---- location search ---------------------------------------------------

    pub async fn set_postal_code(&self, code: &str) {
        self.state.lock().await.selector.set_postal_code(code);
    }

    pub async fn set_area(&self, option: SelectOption) -> Result<()> {
        let mut state = self.state.lock().await;
        let outcome = state.selector.set_area(option);
        Self::note_validation(&mut state, outcome, "set_area")
    }

    pub async fn set_local_area(&self, option: SelectOption) -> Result<()> {
        let mut state = self.state.lock().await;
        let outcome = state.selector.set_local_area(option);
        Self::note_validation(&mut state, outcome, "set_local_area")
    }

    pub async fn location(&self) -> LocationQuery {
        self.state.lock().await.selector.query().clone()
    }

    pub async fn can_search(&self) -> bool {
        self.state.lock().await.selector.can_search()
    }

    pub async fn area_options(&self, input: &str) -> OptionLoad {
        let request = self.state.lock().await.selector.options_for(ScopeLevel::Area);
        request.load(input).await
    }

    pub async fn local_area_options(&self, input: &str) -> OptionLoad {
        let request = self.state.lock().await.selector.options_for(ScopeLevel::LocalArea);
        request.load(input).await
    }

    pub async fn option_error(&self, level: ScopeLevel) -> Option<ScopedError> {
        let cache = self.state.lock().await.selector.option_cache().clone();
        cache.last_error(level).await
    }

    /// Searches the selected local area; requires all three selections
    pub async fn submit_search(&self) -> Result<Refresh> {
        let (generation, search) = {
            let mut state = self.state.lock().await;
            let search = state.selector.search_request();
            let search = Self::note_validation(&mut state, search, "submit_search")?;
            (state.generations.issue(SessionScope::Records), search)
        };
        let fetched = search.run(self.service.as_ref()).await;
        self.apply_records(generation, fetched, MSG_SEARCH_FAILED).await
    }

    // ---- clashes -----------------------------------------------------------

    pub async fn check_clashes(&self, postal_code: &str) -> Result<Refresh> {
        let generation = {
            let mut state = self.state.lock().await;
            let request = ConflictProcessor::request(postal_code);
            Self::note_validation(&mut state, request, "check_clashes")?;
            state.generations.issue(SessionScope::Clashes)
        };

        let outcome = self.clashes.check_clashes(postal_code).await;

        let mut state = self.state.lock().await;
        if !state.generations.is_current(&SessionScope::Clashes, generation) {
            return Ok(Self::superseded(SessionScope::Clashes));
        }
        match outcome {
            Ok(result) => {
                state.clash_result = Some(result);
                state.error = None;
                Ok(Refresh::Applied)
            }
            Err(e) => {
                warn!(error = %e, "clash check failed");
                state.clash_result = None;
                state.error = Some(MSG_CLASHES_FAILED.to_string());
                Err(e)
            }
        }
    }

    pub async fn clash_result(&self) -> Option<ClashResult> {
        self.state.lock().await.clash_result.clone()
    }

    // ---- paging ------------------------------------------------------------

    pub async fn next_page(&self) -> bool {
        self.state.lock().await.pager.next_page()
    }

    pub async fn prev_page(&self) -> bool {
        self.state.lock().await.pager.prev_page()
    }

    pub async fn go_to_page(&self, page: usize) {
        self.state.lock().await.pager.seek(page);
    }

    pub async fn current_page(&self) -> PageView {
        let state = self.state.lock().await;
        let pager = &state.pager;
        PageView {
            page: pager.page(),
            page_count: pager.page_count(),
            total: pager.total(),
            has_prev: pager.has_prev(),
            has_next: pager.has_next(),
            records: pager.current_slice().to_vec(),
        }
    }

    pub async fn error_message(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    // ---- internals ---------------------------------------------------------

    fn note_validation<T>(state: &mut SessionState, outcome: Result<T>, action: &'static str) -> Result<T> {
        if let Err(e) = &outcome {
            if e.is_validation() {
                metrics::session::validation_rejected(action);
                state.error = Some(e.to_string());
            }
        }
        outcome
    }

    fn superseded(scope: SessionScope) -> Refresh {
        debug!(scope = scope.as_str(), "discarding superseded response");
        metrics::session::superseded(scope.as_str());
        Refresh::Superseded
    }

    async fn apply_records(
        &self,
        generation: Generation,
        fetched: Result<Vec<TenderRecord>>,
        failure_message: &str,
    ) -> Result<Refresh> {
        let mut state = self.state.lock().await;
        if !state.generations.is_current(&SessionScope::Records, generation) {
            return Ok(Self::superseded(SessionScope::Records));
        }
        match fetched {
            Ok(records) => {
                info!(count = records.len(), "tender list replaced");
                state.pager.set_records(records);
                state.error = None;
                Ok(Refresh::Applied)
            }
            Err(e) => {
                warn!(error = %e, "{}", failure_message);
                state.pager.set_records(Vec::new());
                state.error = Some(failure_message.to_string());
                Err(e)
            }
        }
    }
}
