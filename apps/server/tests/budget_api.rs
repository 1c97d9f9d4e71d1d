use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use buildledger_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn test_app() -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let mut config = Config::from_env().unwrap();
    config.db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    config.default_currency = "USD".to_string();
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config).unwrap(), tmp)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    org: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(org) = org {
        builder = builder.header("X-Organization-Id", org);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

async fn create_cost_code(app: &Router, org: &str, code: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/cost-codes",
        Some(org),
        Some(json!({ "code": code, "name": name, "category": "Structure" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

/// Work pack with two cost codes, three line items and two expenses.
async fn seed_work_pack(app: &Router, org: &str) -> String {
    let concrete = create_cost_code(app, org, "01", "Concrete").await;
    let framing = create_cost_code(app, org, "02", "Framing").await;

    let (status, work_pack) = send(
        app,
        "POST",
        "/api/v1/work-packs",
        Some(org),
        Some(json!({ "name": "Foundation" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let work_pack_id = work_pack["id"].as_str().unwrap().to_string();

    let items = [
        json!({ "costCodeId": concrete, "lineItemName": "Slab pour", "quantity": 2, "unitPrice": 100 }),
        json!({ "costCodeId": framing, "lineItemName": "Studs", "quantity": 1, "unitPrice": 50, "unit": "lot" }),
    ];
    for item in items {
        let (status, _) = send(
            app,
            "POST",
            &format!("/api/v1/work-packs/{}/items", work_pack_id),
            Some(org),
            Some(item),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let expenses = [
        json!({ "costCodeId": concrete, "description": "Ready mix", "amount": 180, "category": "materials", "vendor": "Ready Mix Co" }),
        json!({ "description": "Permit", "amount": 20, "category": "fees" }),
    ];
    for expense in expenses {
        let (status, _) = send(
            app,
            "POST",
            &format!("/api/v1/work-packs/{}/expenses", work_pack_id),
            Some(org),
            Some(expense),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    work_pack_id
}

#[tokio::test]
async fn healthz_works() {
    let (app, _tmp) = test_app().await;
    let (status, _) = send(&app, "GET", "/api/v1/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_organization_header_is_bad_request() {
    let (app, _tmp) = test_app().await;
    let (status, body) = send(&app, "GET", "/api/v1/cost-codes", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = send(&app, "GET", "/api/v1/cost-codes", Some("  "), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn budget_view_reconciles_work_pack() {
    let (app, _tmp) = test_app().await;
    let work_pack_id = seed_work_pack(&app, "org-1").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/work-packs/{}/budget", work_pack_id),
        Some("org-1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let summary = &body["summary"];
    assert_eq!(number(&summary["totalBudget"]), 250.0);
    assert_eq!(number(&summary["totalActual"]), 200.0);
    assert_eq!(number(&summary["variance"]), -50.0);
    assert_eq!(number(&summary["variancePercentage"]), -20.0);
    assert_eq!(summary["costCodesCount"], 3);

    let numbers: Vec<&str> = body["costCodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["costCodeId"].as_str().unwrap())
        .collect();
    assert_eq!(numbers.len(), 3);
    assert_eq!(numbers[2], "no-cost-code");
    assert_eq!(body["costCodes"][0]["costCodeNumber"], "01");
    assert_eq!(body["costCodes"][1]["costCodeNumber"], "02");

    assert_eq!(body["currency"], "USD");
    assert_eq!(body["formatted"]["totalBudget"], "$250.00");
    assert_eq!(body["formatted"]["variance"], "-$50.00");
    assert_eq!(body["formatted"]["variancePercentage"], "-20.00%");
    assert_eq!(body["vendors"][0]["vendor"], "Ready Mix Co");
}

#[tokio::test]
async fn budget_filter_keeps_global_summary() {
    let (app, _tmp) = test_app().await;
    let work_pack_id = seed_work_pack(&app, "org-1").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/work-packs/{}/budget?search=fram", work_pack_id),
        Some("org-1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["costCodes"].as_array().unwrap().len(), 1);
    assert_eq!(body["costCodes"][0]["costCodeName"], "Framing");
    assert_eq!(number(&body["summary"]["totalBudget"]), 250.0);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/v1/work-packs/{}/budget?category=all", work_pack_id),
        Some("org-1"),
        None,
    )
    .await;
    assert_eq!(body["costCodes"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn other_organization_cannot_read_budget() {
    let (app, _tmp) = test_app().await;
    let work_pack_id = seed_work_pack(&app, "org-1").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/work-packs/{}/budget", work_pack_id),
        Some("org-2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn refresh_publishes_loaded_state() {
    let (app, _tmp) = test_app().await;
    let work_pack_id = seed_work_pack(&app, "org-1").await;
    let state_uri = format!("/api/v1/work-packs/{}/budget/state", work_pack_id);

    let (_, body) = send(&app, "GET", &state_uri, Some("org-1"), None).await;
    assert_eq!(body["status"], "idle");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/work-packs/{}/budget/refresh", work_pack_id),
        Some("org-1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "loaded");
    assert_eq!(body["requestId"], 1);
    assert_eq!(number(&body["budget"]["summary"]["totalActual"]), 200.0);

    let (_, body) = send(&app, "GET", &state_uri, Some("org-1"), None).await;
    assert_eq!(body["status"], "loaded");

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/work-packs/missing/budget/refresh",
        Some("org-1"),
        None,
    )
    .await;
    assert_eq!(body["status"], "loadFailed");

    let (_, body) = send(
        &app,
        "GET",
        "/api/v1/work-packs/missing/budget/state",
        Some("org-1"),
        None,
    )
    .await;
    assert_eq!(body["status"], "idle");
}

#[tokio::test]
async fn duplicate_cost_code_conflicts() {
    let (app, _tmp) = test_app().await;
    create_cost_code(&app, "org-1", "03-300", "Concrete").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/cost-codes",
        Some("org-1"),
        Some(json!({ "code": "03-300", "name": "Concrete again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let (app, _tmp) = test_app().await;
    let (_, work_pack) = send(
        &app,
        "POST",
        "/api/v1/work-packs",
        Some("org-1"),
        Some(json!({ "name": "Roof" })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/work-packs/{}/items", work_pack["id"].as_str().unwrap()),
        Some("org-1"),
        Some(json!({ "lineItemName": "Shingles", "quantity": -3, "unitPrice": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/work-packs/{}/items", work_pack["id"].as_str().unwrap()),
        Some("org-1"),
        Some(json!({
            "lineItemName": "Shingles",
            "quantity": 1_000_000_000_000_000_u64,
            "unitPrice": 1_000_000_000_000_000_u64
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/work-packs/{}/budget", work_pack["id"].as_str().unwrap()),
        Some("org-1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["itemsCount"], 0);
}

#[tokio::test]
async fn deleting_work_pack_removes_it() {
    let (app, _tmp) = test_app().await;
    let work_pack_id = seed_work_pack(&app, "org-1").await;
    let uri = format!("/api/v1/work-packs/{}", work_pack_id);
    let state_uri = format!("{}/budget/state", uri);
    send(&app, "POST", &format!("{}/budget/refresh", uri), Some("org-1"), None).await;
    let (_, body) = send(&app, "GET", &state_uri, Some("org-1"), None).await;
    assert_eq!(body["status"], "loaded");

    let (status, _) = send(&app, "DELETE", &uri, Some("org-1"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &state_uri, Some("org-1"), None).await;
    assert_eq!(body["status"], "idle");

    let (status, _) = send(&app, "GET", &uri, Some("org-1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some("org-1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
