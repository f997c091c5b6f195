use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use tender_scout::config::ServiceConfig;

/// Pincode for which the stub answers every endpoint with a server error
pub const BROKEN_PINCODE: &str = "999999";

struct StubState {
    records: Vec<Value>,
    clashes: Value,
    requests: Mutex<Vec<String>>,
}

/// In-process stand-in for the tender service, mounted under `/tender`
pub struct StubService {
    pub addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubService {
    pub fn config(&self) -> ServiceConfig {
        ServiceConfig {
            base_url: format!("http://{}/tender/", self.addr),
            ..ServiceConfig::default()
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }
}

pub fn tender(id: u32, pincode: &str, area: &str, local_area: &str, decision: &str) -> Value {
    json!({
        "Tender_ID": id,
        "Tender_By_Location": format!("{} Ward", area),
        "Tender_By_Department": if id % 2 == 0 { "Roads" } else { "Water Supply" },
        "Tender_By_Classification": "Civil",
        "Sanction_Date": "2024-04-01T00:00:00.000Z",
        "Completion_Date": "2024-12-31T00:00:00.000Z",
        "Sanction_Amount": 1_250_000 + id * 1000,
        "Total_Duration_Days": 274,
        "Priorities": "Medium",
        "Cancel_Accept_Tenders": decision,
        "Tender_Status": "Open",
        "pincode": pincode,
        "area_name": area,
        "local_area_name": local_area
    })
}

pub fn sample_records() -> Vec<Value> {
    vec![
        tender(1, "411001", "Shivajinagar", "Model Colony", "Accepted"),
        tender(2, "411001", "Shivajinagar", "Model Colony", "Cancelled"),
        tender(3, "411001", "Shivajinagar", "Deccan", "Accepted"),
        tender(4, "411001", "Kothrud", "Karve Nagar", "Accepted"),
        tender(5, "411002", "Swargate", "Gultekdi", "Accepted"),
    ]
}

async fn list(State(state): State<Arc<StubState>>) -> Json<Value> {
    state.requests.lock().unwrap().push("GET /tenders".to_string());
    Json(Value::Array(state.records.clone()))
}

async fn filter(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    state.requests.lock().unwrap().push(format!("POST /tenders/filter {}", body));
    let search_by = body["search_by"].as_str().unwrap_or_default();
    let term = body["search_term"].as_str().unwrap_or_default();
    if term == BROKEN_PINCODE {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if search_by.is_empty() {
        return Ok(Json(Value::Array(state.records.clone())));
    }
    let matched = state
        .records
        .iter()
        .filter(|r| match &r[search_by] {
            Value::String(s) => s.to_lowercase().contains(&term.to_lowercase()),
            Value::Number(n) => n.to_string() == term,
            _ => false,
        })
        .cloned()
        .collect();
    Ok(Json(Value::Array(matched)))
}

async fn check_clashes(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state.requests.lock().unwrap().push(format!("POST /checkclashes {}", body));
    if body["pincode"] == BROKEN_PINCODE {
        return Err((StatusCode::BAD_GATEWAY, "clash engine offline".to_string()));
    }
    Ok(Json(state.clashes.clone()))
}

pub async fn spawn_stub(records: Vec<Value>, clashes: Value) -> anyhow::Result<StubService> {
    let state = Arc::new(StubState {
        records,
        clashes,
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/tender/tenders", get(list))
        .route("/tender/tenders/filter", post(filter))
        .route("/tender/checkclashes", post(check_clashes))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;
    let server = axum::Server::from_tcp(listener)?.serve(app.into_make_service());
    tokio::spawn(async move {
        let _ = server.await;
    });

    Ok(StubService { addr, state })
}
