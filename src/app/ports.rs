use crate::common::error::Result;
use crate::common::types::{ClashRequest, ClashResponse, FilterRequest, TenderRecord};
use async_trait::async_trait;

/// Boundary to the remote tender-data service
#[async_trait]
pub trait TenderServicePort: Send + Sync {
    /// `GET /tenders`: every tender, unfiltered
    async fn list_tenders(&self) -> Result<Vec<TenderRecord>>;

    /// `POST /tenders/filter`: the service applies the filter
    async fn filter_tenders(&self, request: &FilterRequest) -> Result<Vec<TenderRecord>>;

    /// `POST /checkclashes`
    async fn check_clashes(&self, request: &ClashRequest) -> Result<ClashResponse>;
}
