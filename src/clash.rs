use crate::app::ports::TenderServicePort;
use crate::common::constants::MSG_PINCODE_REQUIRED;
use crate::common::error::{Result, TenderError};
use crate::common::types::{ClashEntry, ClashRequest, ClashResponse};
use std::sync::Arc;
use tracing::{info, instrument};

/// Normalized outcome of a clash check
#[derive(Debug, Clone, PartialEq)]
pub enum ClashResult {
    NoClashes,
    /// Ordered High, Medium, Low, then unrecognized priorities
    Clashes(Vec<ClashEntry>),
}

impl ClashResult {
    pub fn entries(&self) -> &[ClashEntry] {
        match self {
            ClashResult::NoClashes => &[],
            ClashResult::Clashes(entries) => entries,
        }
    }
}

pub struct ConflictProcessor {
    service: Arc<dyn TenderServicePort>,
}

impl ConflictProcessor {
    pub fn new(service: Arc<dyn TenderServicePort>) -> Self {
        Self { service }
    }

    /// Rejects a blank postal code before any request is made
    pub fn request(postal_code: &str) -> Result<ClashRequest> {
        let pincode = postal_code.trim();
        if pincode.is_empty() {
            return Err(TenderError::validation(MSG_PINCODE_REQUIRED));
        }
        Ok(ClashRequest { pincode: pincode.to_string() })
    }

    #[instrument(skip(self))]
    pub async fn check_clashes(&self, postal_code: &str) -> Result<ClashResult> {
        let request = Self::request(postal_code)?;
        let response = self.service.check_clashes(&request).await?;
        let result = Self::normalize(response);
        info!(clashes = result.entries().len(), "clash check complete");
        Ok(result)
    }

    /// A missing or empty `clashes` list means no clashes
    pub fn normalize(response: ClashResponse) -> ClashResult {
        match response.clashes {
            Some(mut entries) if !entries.is_empty() => {
                sort_by_priority(&mut entries);
                ClashResult::Clashes(entries)
            }
            _ => ClashResult::NoClashes,
        }
    }
}

/// Stable sort; entries sharing a priority keep the service's order
pub fn sort_by_priority(entries: &mut [ClashEntry]) {
    entries.sort_by_key(|entry| entry.priority().rank());
}
