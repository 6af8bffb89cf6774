use auditdesk_gateway::app::{create_app, AppState};
use auditdesk_gateway::config::Settings;
use auditdesk_gateway::services::testing::StaticTransport;
use auditdesk_gateway::services::HttpTransport;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn router(transport: StaticTransport) -> Router {
    let state = AppState::new(
        Settings::for_backoffice("http://backoffice.test"),
        Arc::new(transport),
    );
    create_app(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_degraded_when_back_office_is_down() {
    let app = router(StaticTransport::new().fail("/health", "connection refused"));
    let (status, body) = send(app, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["backOffice"], "error");
}

#[tokio::test]
async fn page_falls_back_to_sample_data() {
    let app = router(StaticTransport::new().reply("/api/etl/pipelines", 503, json!({})));
    let (status, body) = send(app, get_request("/pages/etl")).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["state"]["activeTab"], "overview");
    assert_eq!(data["pipelines"].as_array().unwrap().len(), 3);
    assert_eq!(data["sources"][0]["panel"], "pipelines");
    assert_eq!(data["sources"][0]["state"], "fallback");
}

#[tokio::test]
async fn page_uses_live_data_and_view_query() {
    let transport = StaticTransport::new().reply(
        "/api/supplier-reconciliations",
        200,
        json!({"reconciliations": [{
            "id": 41,
            "supplierName": "Initech",
            "supplierCode": "SUP-099",
            "period": "2024-03",
            "status": "pending",
            "supplierBalance": 1000,
            "internalBalance": 800,
            "difference": 150,
            "items": [{"id": "a", "type": "invoice", "amount": 200, "status": "unmatched"}]
        }]}),
    );
    let app = router(transport);
    let (status, body) = send(
        app,
        get_request("/pages/reconciliations?modal=detail&editing=41"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["sources"][0]["state"], "fresh");
    assert_eq!(data["state"]["modal"], "detail");
    assert_eq!(data["detail"]["supplierCode"], "SUP-099");
    // reported difference is shown as given and flagged
    assert_eq!(data["detail"]["difference"], "$150");
    assert_eq!(data["detail"]["differenceInconsistent"], true);
}

#[tokio::test]
async fn invalid_engagement_never_reaches_back_office() {
    let transport = StaticTransport::new();
    let app = router(transport.clone());

    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/audit/engagements",
            json!({
                "name": "FY2024",
                "clientName": "Northwind",
                "engagementType": "financial_audit",
                "periodStart": "2024-12-31",
                "periodEnd": "2024-01-01",
                "materialityThreshold": 0
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(
        body["fields"]["periodEnd"],
        "Period end must be after period start"
    );
    assert!(body["fields"]["materialityThreshold"].is_string());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn valid_engagement_is_created_upstream() {
    let transport = StaticTransport::new().reply(
        "/api/audit/engagements",
        201,
        json!({
            "id": 17,
            "name": "FY2024",
            "clientName": "Northwind",
            "engagementType": "review",
            "periodStart": "2024-01-01",
            "periodEnd": "2024-12-31",
            "status": "planning",
            "progress": 0
        }),
    );
    let app = router(transport.clone());

    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/audit/engagements",
            json!({
                "name": "FY2024",
                "clientName": "Northwind",
                "type": "review",
                "periodStart": "2024-01-01",
                "periodEnd": "2024-12-31"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], "17");
    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::POST);
    assert_eq!(sent[0].body.as_ref().unwrap()["engagementType"], "review");
}

#[tokio::test]
async fn rejected_submission_gets_generic_message() {
    let transport = StaticTransport::new().reply(
        "/api/audit/findings",
        500,
        json!({"message": "constraint violation on findings_pkey"}),
    );
    let app = router(transport);

    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/audit/findings",
            json!({"title": "Cut-off error", "severity": "high", "description": "Late invoices"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Failed to save finding, please try again");
}

#[tokio::test]
async fn toggle_persists_only_the_targeted_item() {
    let transport = StaticTransport::new()
        .reply(
            "/api/supplier-reconciliations/rec-1",
            200,
            json!({
                "id": "rec-1",
                "supplierName": "Acme",
                "supplierCode": "SUP-001",
                "period": "2024-02",
                "supplierBalance": 100,
                "internalBalance": 100,
                "difference": 0,
                "items": [
                    {"id": "i1", "type": "invoice", "amount": 50, "status": "matched", "matchedWith": "i2"},
                    {"id": "i2", "type": "payment", "amount": -50, "status": "matched", "matchedWith": "i1"}
                ]
            }),
        )
        .reply(
            "/api/supplier-reconciliations/rec-1/items/i1",
            200,
            json!({}),
        );
    let app = router(transport.clone());

    let (status, body) = send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/reconciliations/rec-1/items/i1/toggle")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items[0]["status"], "unmatched");
    assert_eq!(items[1]["status"], "matched");

    let sent = transport.requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].method, Method::PATCH);
    assert_eq!(
        sent[1].body,
        Some(json!({"status": "unmatched", "matchedWith": null}))
    );
}

#[tokio::test]
async fn toggle_of_unknown_item_is_not_found() {
    let transport = StaticTransport::new().reply(
        "/api/supplier-reconciliations/rec-1",
        200,
        json!({
            "id": "rec-1",
            "supplierName": "Acme",
            "supplierCode": "SUP-001",
            "period": "2024-02",
            "supplierBalance": 0,
            "internalBalance": 0,
            "difference": 0
        }),
    );
    let app = router(transport.clone());

    let (status, body) = send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/reconciliations/rec-1/items/nope/dispute")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn snap_timeline_rejects_out_of_range_duration() {
    let app = router(StaticTransport::new());
    let (status, _) = send(app.clone(), get_request("/effects/snap?durationMs=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app, get_request("/effects/snap?durationMs=100&frameIntervalMs=50")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fallbackAfterMs"], 300);
    assert_eq!(body["data"]["frames"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn cookie_and_request_id_reach_the_back_office() {
    async fn rates(headers: HeaderMap) -> Json<Value> {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let has_request_id = headers.contains_key("x-request-id");
        Json(json!({"rates": [{
            "pair": format!("{cookie}|{has_request_id}"),
            "rate": 1.1,
            "previousRate": 1.0,
            "change": 0.1,
            "changePercent": 10
        }]}))
    }

    let upstream = Router::new().route("/api/forex/rates", get(rates));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let base = format!("http://{addr}");
    let transport = HttpTransport::new(&base, 5).unwrap();
    let app = create_app(AppState::new(
        Settings::for_backoffice(&base),
        Arc::new(transport),
    ));

    let (status, body) = send(
        app,
        Request::builder()
            .uri("/pages/forex")
            .header(header::COOKIE, "session=abc")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sources"][0]["state"], "fresh");
    assert_eq!(body["data"]["rates"][0]["pair"], "session=abc|true");
    assert_eq!(body["data"]["rates"][0]["change"], "+0.1000");
}

#[tokio::test]
async fn ids_that_would_escape_their_collection_are_rejected() {
    let transport = StaticTransport::new();
    let app = router(transport.clone());

    let (status, body) = send(
        app.clone(),
        Request::builder()
            .method(Method::DELETE)
            .uri("/audit/engagements/..%2F..%2Fintegrations%2Fstripe")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/reconciliations/rec-1%3Fforce%3Dtrue/items/i1/toggle")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(transport.requests().is_empty());
}

/// Back office whose first forex call is slow; later calls answer at once.
async fn slow_first_forex_upstream() -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let upstream = Router::new().route(
        "/api/forex/rates",
        get({
            let hits = hits.clone();
            move || async move {
                if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                }
                Json(json!({"rates": [{
                    "pair": "EUR/USD",
                    "rate": 1.1,
                    "previousRate": 1.0,
                    "change": 0.1,
                    "changePercent": 10
                }]}))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let transport = HttpTransport::new(&base, 5).unwrap();
    let app = create_app(AppState::new(
        Settings::for_backoffice(&base),
        Arc::new(transport),
    ));
    (app, hits)
}

fn forex_load(cookie: Option<&str>, view: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/pages/forex");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    if let Some(view) = view {
        builder = builder.header("x-view-id", view);
    }
    builder.body(Body::empty()).unwrap()
}

/// Start `first`, wait until it is waiting on the back office, then run
/// `second` while it is still in flight. Returns both statuses in order.
async fn overlapping(first: Request<Body>, second: Request<Body>) -> (StatusCode, StatusCode) {
    let (app, hits) = slow_first_forex_upstream().await;

    let slow = tokio::spawn(send(app.clone(), first));
    while hits.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let (second_status, _) = send(app, second).await;
    let (first_status, _) = slow.await.unwrap();
    (first_status, second_status)
}

#[tokio::test]
async fn anonymous_callers_loading_the_same_page_both_succeed() {
    let statuses = overlapping(forex_load(None, None), forex_load(None, None)).await;
    assert_eq!(statuses, (StatusCode::OK, StatusCode::OK));
}

#[tokio::test]
async fn tabs_of_one_session_do_not_supersede_each_other() {
    let statuses = overlapping(
        forex_load(Some("session=abc"), Some("tab-1")),
        forex_load(Some("session=abc"), Some("tab-2")),
    )
    .await;
    assert_eq!(statuses, (StatusCode::OK, StatusCode::OK));

    let statuses = overlapping(
        forex_load(Some("session=abc"), None),
        forex_load(Some("session=abc"), None),
    )
    .await;
    assert_eq!(statuses, (StatusCode::OK, StatusCode::OK));
}

#[tokio::test]
async fn reload_of_the_same_view_drops_the_older_response() {
    let statuses = overlapping(
        forex_load(Some("session=abc"), Some("tab-1")),
        forex_load(Some("session=abc"), Some("tab-1")),
    )
    .await;
    assert_eq!(statuses, (StatusCode::CONFLICT, StatusCode::OK));
}
