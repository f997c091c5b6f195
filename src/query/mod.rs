// Query resolution: dependent selection, option caching, filter building and paging

pub mod cascade;
pub mod filter_spec;
pub mod generation;
pub mod option_cache;
pub mod pager;

pub use cascade::{CascadingSelector, LocationEdit, LocationQuery, LocationSearch, SelectionState};
pub use filter_spec::{ColumnToggle, FilterSpec, FilterSpecBuilder};
pub use generation::{Generation, GenerationCounter};
pub use option_cache::{OptionCache, OptionLoad, ScopeKey, ScopeLevel, ScopedError};
pub use pager::ResultPager;
