use crate::app::ports::TenderServicePort;
use crate::common::constants::{CHECK_CLASHES_PATH, FILTER_PATH, TENDERS_PATH};
use crate::common::error::{Result, TenderError};
use crate::common::types::{ClashRequest, ClashResponse, FilterRequest, TenderRecord};
use crate::config::ServiceConfig;
use crate::observability::metrics;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

const MAX_ERROR_BODY: usize = 200;

/// reqwest-backed client for the tender service
pub struct ReqwestTenderService {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTenderService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        resp: reqwest::Response,
    ) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let mut message: String = body.chars().take(MAX_ERROR_BODY).collect();
            if message.trim().is_empty() {
                message = status.canonical_reason().unwrap_or("request failed").to_string();
            }
            warn!(endpoint, status = status.as_u16(), "tender service returned an error status");
            metrics::upstream::request_error(endpoint);
            return Err(TenderError::Upstream { status: status.as_u16(), message });
        }

        let bytes = resp.bytes().await.map_err(|e| {
            metrics::upstream::request_error(endpoint);
            TenderError::from(e)
        })?;
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            metrics::upstream::request_error(endpoint);
            TenderError::from(e)
        })?;
        metrics::upstream::request_success(endpoint);
        Ok(value)
    }

    fn transport_error(endpoint: &'static str, err: reqwest::Error) -> TenderError {
        warn!(endpoint, error = %err, "tender service request failed");
        metrics::upstream::request_error(endpoint);
        TenderError::from(err)
    }
}

#[async_trait]
impl TenderServicePort for ReqwestTenderService {
    #[instrument(skip(self))]
    async fn list_tenders(&self) -> Result<Vec<TenderRecord>> {
        let resp = self
            .client
            .get(self.url(TENDERS_PATH))
            .send()
            .await
            .map_err(|e| Self::transport_error("tenders", e))?;
        let records: Vec<TenderRecord> = Self::decode("tenders", resp).await?;
        metrics::upstream::records_received("tenders", records.len());
        debug!(count = records.len(), "listed tenders");
        Ok(records)
    }

    #[instrument(skip(self), fields(search_by = %request.search_by))]
    async fn filter_tenders(&self, request: &FilterRequest) -> Result<Vec<TenderRecord>> {
        let resp = self
            .client
            .post(self.url(FILTER_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| Self::transport_error("filter", e))?;
        let records: Vec<TenderRecord> = Self::decode("filter", resp).await?;
        metrics::upstream::records_received("filter", records.len());
        debug!(count = records.len(), "filtered tenders");
        Ok(records)
    }

    #[instrument(skip(self), fields(pincode = %request.pincode))]
    async fn check_clashes(&self, request: &ClashRequest) -> Result<ClashResponse> {
        let resp = self
            .client
            .post(self.url(CHECK_CLASHES_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| Self::transport_error("checkclashes", e))?;
        Self::decode("checkclashes", resp).await
    }
}
