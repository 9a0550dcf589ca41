//! # Integration Tests for geodash-api
//!
//! Drives the full router with `oneshot`: health probes, catalog queries,
//! the session cascade, CSV export, the IP allow-list, metrics and the
//! OpenAPI document.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use geodash_api::config::AppConfig;
use geodash_api::middleware::metrics::ApiMetrics;
use geodash_api::state::AppState;
use geodash_core::{Catalog, FactRecord, Taxonomy};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Helper: a small deterministic catalog with a known USA/Energy subset.
fn fixture_catalog() -> Catalog {
    let record = |company: &str, country: &str, sector: &str| FactRecord {
        company: company.to_string(),
        country: country.to_string(),
        sector: sector.to_string(),
        stock_price: 100.0,
        market_cap: 25.0,
        revenue: 8.0,
        employees: 3000,
    };
    Catalog::new(
        Taxonomy::builtin(),
        vec![
            record("Energy Corp 1", "USA", "Energy"),
            record("Energy Corp 2", "Canada", "Energy"),
            record("Energy Corp 3", "USA", "Energy"),
            record("Utilities Corp 1", "USA", "Utilities"),
            record("Financials Corp 1", "Japan", "Financials"),
        ],
    )
}

/// Helper: build the test app with no allow-list.
fn test_app() -> axum::Router {
    geodash_api::app(AppState::with_catalog(fixture_catalog(), AppConfig::default()))
}

/// Helper: build the test app with an allow-list.
fn test_app_with_allow_list(ips: &[&str]) -> axum::Router {
    let config = AppConfig {
        allowed_ips: ips.iter().map(|ip| ip.parse().unwrap()).collect(),
        ..AppConfig::default()
    };
    geodash_api::app(AppState::with_catalog(fixture_catalog(), config))
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: create a session and return its id.
async fn create_session(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

/// Helper: post an event and return the JSON response.
async fn send_event(app: &axum::Router, id: &str, event: Value) -> Value {
    let response = app
        .clone()
        .oneshot(post_json(&format!("/v1/sessions/{id}/events"), &event))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app().oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let response = test_app().oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Catalog ------------------------------------------------------------------

#[tokio::test]
async fn test_list_zones_sorted() {
    let response = test_app().oneshot(get("/v1/zones")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let zones: Vec<&str> = json["zones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|z| z.as_str().unwrap())
        .collect();
    assert_eq!(zones.len(), 7);
    let mut sorted = zones.clone();
    sorted.sort_unstable();
    assert_eq!(zones, sorted);
}

#[tokio::test]
async fn test_zone_countries() {
    let response = test_app()
        .oneshot(get("/v1/zones/North%20America/countries"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Countries in North America");
    let codes: Vec<&str> = json["countries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["territory_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["USA", "CAN", "MEX"]);
}

#[tokio::test]
async fn test_unresolved_country_has_empty_code() {
    let response = test_app()
        .oneshot(get("/v1/zones/Middle%20East/countries"))
        .await
        .unwrap();
    let json = body_json(response).await;
    let uae = json["countries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["country"] == "UAE")
        .unwrap()
        .clone();
    assert_eq!(uae["territory_code"], "");
    assert_eq!(uae["hover_label"], "UAE");
}

#[tokio::test]
async fn test_unknown_zone_is_404() {
    let response = test_app()
        .oneshot(get("/v1/zones/Atlantis/countries"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_country_sectors() {
    let response = test_app()
        .oneshot(get("/v1/countries/USA/sectors"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["sectors"], json!(["Energy", "Utilities"]));

    // Known country without records: empty, not an error.
    let response = test_app()
        .oneshot(get("/v1/countries/Mexico/sectors"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["sectors"], json!([]));
}

#[tokio::test]
async fn test_unknown_country_is_404() {
    let response = test_app()
        .oneshot(get("/v1/countries/Atlantis/sectors"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Sessions -----------------------------------------------------------------

#[tokio::test]
async fn test_new_session_is_empty() {
    let app = test_app();
    let id = create_session(&app).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["selection"]["state"], "EMPTY");
    assert_eq!(json["widgets"], json!(["zone_selector"]));
    assert!(json["view"]["map"].is_null());
}

#[tokio::test]
async fn test_full_cascade_and_export() {
    let app = test_app();
    let id = create_session(&app).await;

    let json = send_event(&app, &id, json!({"type": "set_zone", "zone": "North America"})).await;
    assert_eq!(json["outcome"], "applied");
    assert_eq!(json["to"], "ZONE_CHOSEN");
    assert_eq!(json["session"]["view"]["map"]["entries"].as_array().unwrap().len(), 3);

    let json = send_event(&app, &id, json!({"type": "map_clicked", "code": "USA"})).await;
    assert_eq!(json["outcome"], "applied");
    assert_eq!(json["session"]["selection"]["country"], "USA");
    assert_eq!(json["session"]["selection"]["last_map_click_code"], "USA");
    assert_eq!(
        json["session"]["view"]["sector_options"],
        json!(["Energy", "Utilities"])
    );

    let json = send_event(&app, &id, json!({"type": "set_sector", "sector": "Energy"})).await;
    assert_eq!(json["outcome"], "applied");
    assert_eq!(json["session"]["selection"]["state"], "SECTOR_CHOSEN");
    let dashboard = &json["session"]["view"]["dashboard"];
    let records = dashboard["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r["Country"] == "USA" && r["Sector"] == "Energy"));
    assert_eq!(dashboard["stock_price"]["title"], "Stock Prices in USA");
    assert_eq!(dashboard["table"]["page_size"], 10);

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{id}/export")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"USA_Energy_data.csv\""
    );
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    let csv = body_string(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Company,Country,Sector,Stock Price,Market Cap ($B),Revenue ($B),Employees"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Energy Corp 1,USA,Energy,"));
    assert!(lines[2].starts_with("Energy Corp 3,USA,Energy,"));
}

#[tokio::test]
async fn test_ignored_events_are_200() {
    let app = test_app();
    let id = create_session(&app).await;

    let json = send_event(&app, &id, json!({"type": "map_clicked", "code": "USA"})).await;
    assert_eq!(json["outcome"], "ignored");
    assert_eq!(json["reason"], "no_zone");

    send_event(&app, &id, json!({"type": "set_zone", "zone": "Western Europe"})).await;

    // Not a territory code at all.
    let json = send_event(&app, &id, json!({"type": "map_clicked", "code": "XXX"})).await;
    assert_eq!(json["outcome"], "ignored");
    assert_eq!(json["reason"], "unresolved_territory");
    assert_eq!(json["session"]["selection"]["state"], "ZONE_CHOSEN");

    // Resolvable, but in another zone.
    let json = send_event(&app, &id, json!({"type": "map_clicked", "code": "JPN"})).await;
    assert_eq!(json["reason"], "country_outside_zone");

    let json = send_event(&app, &id, json!({"type": "set_zone", "zone": "Atlantis"})).await;
    assert_eq!(json["reason"], "unknown_zone");
    assert_eq!(json["session"]["selection"]["zone"], "Western Europe");
}

#[tokio::test]
async fn test_unavailable_sector_is_ignored() {
    let app = test_app();
    let id = create_session(&app).await;
    send_event(&app, &id, json!({"type": "set_zone", "zone": "North America"})).await;
    send_event(&app, &id, json!({"type": "map_clicked", "code": "USA"})).await;

    let json = send_event(&app, &id, json!({"type": "set_sector", "sector": "Financials"})).await;
    assert_eq!(json["outcome"], "ignored");
    assert_eq!(json["reason"], "sector_unavailable");
    assert_eq!(json["session"]["selection"]["state"], "COUNTRY_CHOSEN");
}

#[tokio::test]
async fn test_zone_change_clears_country_and_sector() {
    let app = test_app();
    let id = create_session(&app).await;
    send_event(&app, &id, json!({"type": "set_zone", "zone": "North America"})).await;
    send_event(&app, &id, json!({"type": "map_clicked", "code": "USA"})).await;
    send_event(&app, &id, json!({"type": "set_sector", "sector": "Energy"})).await;

    let json = send_event(&app, &id, json!({"type": "set_zone", "zone": "East Asia"})).await;
    let selection = &json["session"]["selection"];
    assert_eq!(selection["state"], "ZONE_CHOSEN");
    assert!(selection["country"].is_null());
    assert!(selection["sector"].is_null());
    assert!(json["session"]["view"]["dashboard"].is_null());
}

#[tokio::test]
async fn test_reset_returns_to_empty() {
    let app = test_app();
    let id = create_session(&app).await;
    send_event(&app, &id, json!({"type": "set_zone", "zone": "Balkans"})).await;
    let json = send_event(&app, &id, json!({"type": "reset"})).await;
    assert_eq!(json["outcome"], "applied");
    assert_eq!(json["session"]["selection"]["state"], "EMPTY");
}

#[tokio::test]
async fn test_malformed_event_is_400() {
    let app = test_app();
    let id = create_session(&app).await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/sessions/{id}/events"),
            &json!({"type": "teleport"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_oversized_event_is_422() {
    let app = test_app();
    let id = create_session(&app).await;
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/sessions/{id}/events"),
            &json!({"type": "set_zone", "zone": "z".repeat(1000)}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["details"]["field"], "zone");
    assert_eq!(json["error"]["details"]["max_len"], 256);
}

#[tokio::test]
async fn test_session_limit_is_503_until_a_session_ends() {
    let config = AppConfig {
        max_sessions: 2,
        ..AppConfig::default()
    };
    let app = geodash_api::app(AppState::with_catalog(fixture_catalog(), config));
    let first = create_session(&app).await;
    create_session(&app).await;

    let new_session = || {
        Request::builder()
            .method("POST")
            .uri("/v1/sessions")
            .body(Body::empty())
            .unwrap()
    };
    let response = app.clone().oneshot(new_session()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(json["error"]["details"]["max_sessions"], 2);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/sessions/{first}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(new_session()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_history_records_applied_transitions_only() {
    let app = test_app();
    let id = create_session(&app).await;
    send_event(&app, &id, json!({"type": "set_zone", "zone": "North America"})).await;
    send_event(&app, &id, json!({"type": "map_clicked", "code": "XXX"})).await;
    send_event(&app, &id, json!({"type": "map_clicked", "code": "CAN"})).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{id}/history")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let transitions = json["transitions"].as_array().unwrap();
    assert_eq!(transitions.len(), 2);
    assert_eq!(transitions[0]["event"], "set_zone");
    assert_eq!(transitions[1]["event"], "map_clicked");
    assert_eq!(transitions[1]["to"], "COUNTRY_CHOSEN");
}

#[tokio::test]
async fn test_export_before_sector_is_409() {
    let app = test_app();
    let id = create_session(&app).await;
    send_event(&app, &id, json!({"type": "set_zone", "zone": "North America"})).await;
    send_event(&app, &id, json!({"type": "map_clicked", "code": "USA"})).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{id}/export")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = test_app();
    let a = create_session(&app).await;
    let b = create_session(&app).await;
    send_event(&app, &a, json!({"type": "set_zone", "zone": "Balkans"})).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{b}")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["selection"]["state"], "EMPTY");
}

#[tokio::test]
async fn test_delete_session() {
    let app = test_app();
    let id = create_session(&app).await;

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri(format!("/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/sessions/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let response = test_app()
        .oneshot(get("/v1/sessions/67e55044-10b1-426f-9247-bb680e5fe0c8"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Access Control -----------------------------------------------------------

fn from_addr(uri: &str, addr: &str) -> Request<Body> {
    let addr: SocketAddr = addr.parse().unwrap();
    Request::builder()
        .uri(uri)
        .extension(ConnectInfo(addr))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_allow_list_admits_listed_address() {
    let app = test_app_with_allow_list(&["10.1.2.3"]);
    let response = app
        .oneshot(from_addr("/v1/zones", "10.1.2.3:50000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_allow_list_rejects_other_address() {
    let app = test_app_with_allow_list(&["10.1.2.3"]);
    let response = app
        .oneshot(from_addr("/v1/zones", "10.9.9.9:50000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_allow_list_rejects_unknown_address() {
    let app = test_app_with_allow_list(&["10.1.2.3"]);
    let response = app.oneshot(get("/v1/zones")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_bypasses_allow_list() {
    let app = test_app_with_allow_list(&["10.1.2.3"]);
    let response = app
        .oneshot(from_addr("/health/liveness", "10.9.9.9:50000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Metrics ------------------------------------------------------------------

#[tokio::test]
async fn test_metrics_without_recorder_is_503() {
    let response = test_app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_counters() {
    let metrics = ApiMetrics::new();
    let app = geodash_api::app_with_metrics(
        AppState::with_catalog(fixture_catalog(), AppConfig::default()),
        metrics.clone(),
    );

    app.clone().oneshot(get("/v1/zones")).await.unwrap();
    app.clone()
        .oneshot(get("/v1/zones/Atlantis/countries"))
        .await
        .unwrap();
    // Health probes are outside the counted stack.
    app.clone().oneshot(get("/health/liveness")).await.unwrap();

    assert_eq!(metrics.requests(), 2);
    assert_eq!(metrics.errors(), 1);
}

#[tokio::test]
async fn test_metric_paths_use_route_templates() {
    let metrics = ApiMetrics::new();
    let app = geodash_api::app_with_metrics(
        AppState::with_catalog(fixture_catalog(), AppConfig::default()),
        metrics.clone(),
    );

    for i in 0..20 {
        let response = app
            .clone()
            .oneshot(get(&format!("/v1/zones/junk{i}/countries")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
    app.clone()
        .oneshot(get("/v1/zones/East%20Asia/countries"))
        .await
        .unwrap();
    app.clone()
        .oneshot(get("/v1/countries/Narnia/sectors"))
        .await
        .unwrap();

    assert_eq!(metrics.requests(), 22);
    assert_eq!(
        metrics.path_labels(),
        vec![
            "/v1/countries/{country}/sectors".to_string(),
            "/v1/zones/{zone}/countries".to_string(),
        ]
    );
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_document() {
    let response = test_app().oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["openapi"].as_str().unwrap().starts_with("3."));
    assert!(json["paths"]["/v1/sessions/{id}/events"].is_object());
}
