mod common;

use anyhow::Result;
use common::{sample_records, spawn_stub, BROKEN_PINCODE};
use serde_json::json;
use tender_scout::app::TenderServicePort;
use tender_scout::common::types::{ClashRequest, FieldName, FilterRequest};
use tender_scout::infra::ReqwestTenderService;
use tender_scout::TenderError;

#[tokio::test]
async fn lists_tenders_and_keeps_wire_fields() -> Result<()> {
    let stub = spawn_stub(sample_records(), json!({})).await?;
    let service = ReqwestTenderService::new(&stub.config())?;

    let records = service.list_tenders().await?;
    assert_eq!(records.len(), 5);
    assert_eq!(records[0].text(FieldName::TenderId).as_deref(), Some("1"));
    assert_eq!(serde_json::to_value(&records[4])?, sample_records()[4]);
    assert_eq!(stub.requests(), vec!["GET /tenders"]);
    Ok(())
}

#[tokio::test]
async fn posts_filter_body_verbatim() -> Result<()> {
    let stub = spawn_stub(sample_records(), json!({})).await?;
    let service = ReqwestTenderService::new(&stub.config())?;

    let request = FilterRequest {
        search_by: "Tender_By_Department".into(),
        search_term: "roads".into(),
        filter_columns: vec![FieldName::TenderId, FieldName::SanctionAmount],
    };
    let records = service.filter_tenders(&request).await?;
    assert_eq!(records.len(), 2);

    let sent = &stub.requests()[0];
    assert!(sent.starts_with("POST /tenders/filter "));
    let body: serde_json::Value = serde_json::from_str(sent.trim_start_matches("POST /tenders/filter "))?;
    assert_eq!(
        body,
        json!({
            "search_by": "Tender_By_Department",
            "search_term": "roads",
            "filter_columns": ["Tender_ID", "Sanction_Amount"]
        })
    );
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_upstream_error() -> Result<()> {
    let stub = spawn_stub(sample_records(), json!({})).await?;
    let service = ReqwestTenderService::new(&stub.config())?;

    let err = service
        .check_clashes(&ClashRequest { pincode: BROKEN_PINCODE.into() })
        .await
        .unwrap_err();
    match err {
        TenderError::Upstream { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "clash engine offline");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }

    let err = service
        .filter_tenders(&FilterRequest::by_pincode(BROKEN_PINCODE))
        .await
        .unwrap_err();
    assert!(err.is_upstream());
    Ok(())
}

#[tokio::test]
async fn clash_response_without_list_decodes() -> Result<()> {
    let stub = spawn_stub(vec![], json!({ "message": "No clashes found" })).await?;
    let service = ReqwestTenderService::new(&stub.config())?;

    let response = service
        .check_clashes(&ClashRequest { pincode: "400001".into() })
        .await?;
    assert!(response.clashes.is_none());
    assert_eq!(stub.requests(), vec![r#"POST /checkclashes {"pincode":"400001"}"#]);
    Ok(())
}

#[tokio::test]
async fn unreachable_service_is_upstream_error() -> Result<()> {
    let stub = spawn_stub(vec![], json!({})).await?;
    let mut config = stub.config();
    // nothing listens on the discard port
    config.base_url = "http://127.0.0.1:9/tender".into();
    drop(stub);

    let service = ReqwestTenderService::new(&config)?;
    let err = service.list_tenders().await.unwrap_err();
    assert!(err.is_upstream());
    assert!(matches!(err, TenderError::Http(_)));
    Ok(())
}
