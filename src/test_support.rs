use crate::app::ports::TenderServicePort;
use crate::common::error::{Result, TenderError};
use crate::common::types::{
    ClashRequest, ClashResponse, FieldName, FilterRequest, TenderRecord,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn tender(id: u32, pincode: &str, area: &str, local_area: &str, decision: &str) -> TenderRecord {
    serde_json::from_value(json!({
        "Tender_ID": id,
        "pincode": pincode,
        "area_name": area,
        "local_area_name": local_area,
        "Cancel_Accept_Tenders": decision,
        "Tender_Status": if decision == "Accepted" { "Open" } else { "Closed" },
    }))
    .unwrap()
}

pub fn ids(records: &[TenderRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.text(FieldName::TenderId))
        .collect()
}

/// In-memory tender service recording every call it receives
pub struct MockTenderService {
    records: Vec<TenderRecord>,
    clash_response: Mutex<Option<Value>>,
    clashes_by_pincode: Mutex<HashMap<String, Value>>,
    failing: AtomicBool,
    calls: Arc<Mutex<Vec<String>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl MockTenderService {
    pub fn new(records: Vec<TenderRecord>) -> Self {
        Self {
            records,
            clash_response: Mutex::new(None),
            clashes_by_pincode: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            calls: Arc::new(Mutex::new(Vec::new())),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_clashes(self, body: Value) -> Self {
        *self.clash_response.lock().unwrap() = Some(body);
        self
    }

    /// Clash body for one pincode, taking precedence over `with_clashes`
    pub fn with_clashes_for(self, pincode: &str, body: Value) -> Self {
        self.clashes_by_pincode
            .lock()
            .unwrap()
            .insert(pincode.to_string(), body);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Holds responses for `search_term` until the returned handle is notified
    pub fn gate(&self, search_term: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(search_term.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failing(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TenderError::Upstream { status: 503, message: "service unavailable".into() });
        }
        Ok(())
    }

    async fn wait_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl TenderServicePort for MockTenderService {
    async fn list_tenders(&self) -> Result<Vec<TenderRecord>> {
        self.record_call("list".to_string());
        self.check_failing()?;
        Ok(self.records.clone())
    }

    async fn filter_tenders(&self, request: &FilterRequest) -> Result<Vec<TenderRecord>> {
        self.record_call(format!("filter:{}={}", request.search_by, request.search_term));
        self.wait_gate(&request.search_term).await;
        self.check_failing()?;
        if request.search_by.is_empty() {
            return Ok(self.records.clone());
        }
        let field: FieldName = request.search_by.parse()?;
        let needle = request.search_term.to_lowercase();
        Ok(self
            .records
            .iter()
            .filter(|r| {
                r.text(field)
                    .map(|v| v.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn check_clashes(&self, request: &ClashRequest) -> Result<ClashResponse> {
        self.record_call(format!("clashes:{}", request.pincode));
        self.wait_gate(&request.pincode).await;
        self.check_failing()?;
        let specific = self.clashes_by_pincode.lock().unwrap().get(&request.pincode).cloned();
        let body = specific
            .or_else(|| self.clash_response.lock().unwrap().clone())
            .unwrap_or_else(|| json!({}));
        Ok(serde_json::from_value(body)?)
    }
}
