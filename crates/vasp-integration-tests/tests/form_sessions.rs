//! # Sector Form Sessions over HTTP
//!
//! Walks the admin sector-data page end to end: open a session over a
//! company, edit fields (including a conditional one), collapse and add
//! sectors, save, and check what the directory stored.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use vasp_api::state::AppState;

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and return status plus JSON body (null for empty bodies).
async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request(method, uri, body)).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn app_with_custodian() -> axum::Router {
    let app = vasp_api::app(AppState::new());
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/companies",
            Some(json!({
                "name": "Vault One",
                "sectors": ["custody-services"],
                "headquarters_location": "Lahore",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    app
}

async fn open(app: &axum::Router) -> (String, Value) {
    let resp = app
        .clone()
        .oneshot(request("POST", "/v1/companies/vault-one/form-sessions", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    (body["id"].as_str().unwrap().to_string(), body)
}

fn edit(sector: &str, field: &str, edit: Value) -> Option<Value> {
    Some(json!({ "sector": sector, "field": field, "edit": edit }))
}

fn field_keys(section: &Value) -> Vec<String> {
    section["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["key"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn session_opens_expanded_with_conditional_hidden() {
    let app = app_with_custodian().await;
    let (_, body) = open(&app).await;

    assert_eq!(body["company"], "vault-one");
    assert_eq!(body["selected"], json!(["custody-services"]));
    let view = &body["view"];
    assert_eq!(view["state"], "sections");
    assert_eq!(view["heading"], "Sector-Specific Configuration");

    let section = &view["sections"][0];
    assert_eq!(section["state"], "expanded");
    assert_eq!(section["icon"], "shield");
    assert_eq!(
        field_keys(section),
        vec!["custody_type", "insurance_coverage", "audit_frequency"]
    );
    assert_eq!(section["fields"][1]["control"], "checkbox");
    assert_eq!(section["fields"][1]["checked"], false);
}

#[tokio::test]
async fn conditional_field_follows_its_controller() {
    let app = app_with_custodian().await;
    let (id, _) = open(&app).await;
    let edits = format!("/v1/form-sessions/{id}/edits");

    let (status, body) = send(
        &app,
        "POST",
        &edits,
        edit("custody-services", "insurance_amount_pkr", json!({ "op": "set_number", "input": "100" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, body) = send(
        &app,
        "POST",
        &edits,
        edit("custody-services", "insurance_coverage", json!({ "op": "set_checked", "checked": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["change"],
        json!({ "sector": "custody-services", "field": "insurance_coverage", "value": true })
    );
    assert_eq!(
        field_keys(&body["view"]["sections"][0]),
        vec!["custody_type", "insurance_coverage", "insurance_amount_pkr", "audit_frequency"]
    );

    let (status, body) = send(
        &app,
        "POST",
        &edits,
        edit("custody-services", "insurance_amount_pkr", json!({ "op": "set_number", "input": "2500000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["change"]["value"], json!(2500000.0));
    assert_eq!(body["view"]["sections"][0]["fields"][2]["value"], json!(2500000.0));

    let (status, body) = send(
        &app,
        "POST",
        &edits,
        edit("custody-services", "insurance_coverage", json!({ "op": "set_checked", "checked": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field_keys(&body["view"]["sections"][0]).len(), 3);
}

#[tokio::test]
async fn edit_errors() {
    let app = app_with_custodian().await;
    let (id, _) = open(&app).await;
    let edits = format!("/v1/form-sessions/{id}/edits");

    let cases = [
        (
            edit("custody-services", "audit_frequency", json!({ "op": "choose", "option": "Hourly" })),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            edit("custody-services", "insurance_coverage", json!({ "op": "set_text", "value": "yes" })),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            edit("custody-services", "custody_type", json!({ "op": "remove_entry", "index": 0 })),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            edit("custody-services", "no_such_field", json!({ "op": "set_text", "value": "x" })),
            StatusCode::NOT_FOUND,
        ),
        (
            edit("exchange-services", "exchange_type", json!({ "op": "choose", "option": "Hybrid" })),
            StatusCode::NOT_FOUND,
        ),
        (
            edit("custody-services", "audit_frequency", json!({ "op": "teleport" })),
            StatusCode::BAD_REQUEST,
        ),
    ];
    for (body, expected) in cases {
        let (status, _) = send(&app, "POST", &edits, body.clone()).await;
        assert_eq!(status, expected, "{body:?}");
    }

    let missing = format!("/v1/form-sessions/{}/edits", uuid::Uuid::new_v4());
    let (status, _) = send(
        &app,
        "POST",
        &missing,
        edit("custody-services", "audit_frequency", json!({ "op": "choose", "option": "Monthly" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn collapsed_section_survives_reselection() {
    let app = app_with_custodian().await;
    let (id, _) = open(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/form-sessions/{id}/toggle/custody-services"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"]["sections"][0]["state"], "collapsed");
    assert_eq!(body["view"]["sections"][0]["fields"], json!([]));

    let sectors = format!("/v1/form-sessions/{id}/sectors");
    let (status, body) = send(
        &app,
        "PUT",
        &sectors,
        Some(json!({ "sectors": ["custody-services", "exchange-services"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sections = body["view"]["sections"].as_array().unwrap();
    assert_eq!(sections[0]["state"], "collapsed");
    assert_eq!(sections[1]["sector_id"], "exchange-services");
    assert_eq!(sections[1]["state"], "expanded");

    let (_, body) = send(&app, "PUT", &sectors, Some(json!({ "sectors": [] }))).await;
    assert_eq!(body["view"]["state"], "empty");
    assert_eq!(body["view"]["icon"], "database");

    let (_, body) = send(
        &app,
        "PUT",
        &sectors,
        Some(json!({ "sectors": ["custody-services"] })),
    )
    .await;
    assert_eq!(body["view"]["sections"][0]["state"], "collapsed");
}

#[tokio::test]
async fn toggle_and_select_errors() {
    let app = app_with_custodian().await;
    let (id, _) = open(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/form-sessions/{id}/toggle/exchange-services"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let sectors = format!("/v1/form-sessions/{id}/sectors");
    let (status, _) = send(
        &app,
        "PUT",
        &sectors,
        Some(json!({ "sectors": ["mining-pools"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "PUT",
        &sectors,
        Some(json!({ "sectors": ["custody-services", "custody-services"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn save_writes_sectors_and_sanitised_details() {
    let app = app_with_custodian().await;
    let (id, _) = open(&app).await;
    let edits = format!("/v1/form-sessions/{id}/edits");

    send(
        &app,
        "PUT",
        &format!("/v1/form-sessions/{id}/sectors"),
        Some(json!({ "sectors": ["custody-services", "exchange-services"] })),
    )
    .await;
    for body in [
        edit("custody-services", "insurance_coverage", json!({ "op": "set_checked", "checked": true })),
        edit("custody-services", "insurance_amount_pkr", json!({ "op": "set_number", "input": "750000" })),
        edit("exchange-services", "exchange_type", json!({ "op": "choose", "option": "Hybrid" })),
        edit("exchange-services", "supported_trading_pairs", json!({ "op": "append_entry" })),
        edit("exchange-services", "supported_trading_pairs", json!({ "op": "edit_entry", "index": 0, "value": "BTC/PKR" })),
    ] {
        let (status, resp) = send(&app, "POST", &edits, body).await;
        assert_eq!(status, StatusCode::OK, "{resp}");
    }

    // Nothing reaches the directory before save.
    let (_, company) = send(&app, "GET", "/v1/companies/vault-one", None).await;
    assert_eq!(company["sector_details"], json!({}));

    let (status, company) = send(&app, "POST", &format!("/v1/form-sessions/{id}/save"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(company["sectors"], json!(["custody-services", "exchange-services"]));
    assert_eq!(
        company["sector_details"],
        json!({
            "custody-services": { "insurance_amount_pkr": 750000.0, "insurance_coverage": true },
            "exchange-services": { "exchange_type": "Hybrid", "supported_trading_pairs": ["BTC/PKR"] },
        })
    );

    // A saved session is closed.
    let (status, _) = send(&app, "GET", &format!("/v1/form-sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deselecting a sector and saving drops its details.
    let (id, _) = open(&app).await;
    send(
        &app,
        "PUT",
        &format!("/v1/form-sessions/{id}/sectors"),
        Some(json!({ "sectors": ["exchange-services"] })),
    )
    .await;
    let (status, company) = send(&app, "POST", &format!("/v1/form-sessions/{id}/save"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(company["sectors"], json!(["exchange-services"]));
    assert!(company["sector_details"].get("custody-services").is_none());

    // An empty selection cannot be saved, and the session stays open.
    let (id, _) = open(&app).await;
    send(
        &app,
        "PUT",
        &format!("/v1/form-sessions/{id}/sectors"),
        Some(json!({ "sectors": [] })),
    )
    .await;
    let (status, _) = send(&app, "POST", &format!("/v1/form-sessions/{id}/save"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(&app, "GET", &format!("/v1/form-sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn session_lifecycle() {
    let app = app_with_custodian().await;
    let (id, _) = open(&app).await;
    let uri = format!("/v1/form-sessions/{id}");

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/v1/companies/ghost/form-sessions",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
