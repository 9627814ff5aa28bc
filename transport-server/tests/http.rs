//! HTTP surface, end to end against mock upstreams.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use transport_server::config::AppConfig;
use transport_server::dispatch::{DispatchConfig, Dispatcher, ProviderRegistry};
use transport_server::tools::ToolSurface;
use transport_server::web::{AppState, create_router};

fn app(config: &AppConfig) -> Router {
    let dispatcher = Dispatcher::new(
        ProviderRegistry::from_config(config),
        DispatchConfig::from_app_config(config),
    );
    create_router(AppState::new(ToolSurface::new(dispatcher)))
}

/// Configuration pointing every provider at `server`.
fn mocked(server: &MockServer) -> AppConfig {
    AppConfig {
        ch_base_url: server.uri(),
        be_base_url: server.uri(),
        uk_base_url: server.uri(),
        ..AppConfig::default()
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn health() {
    let response = app(&AppConfig::default())
        .oneshot(get("/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn tools_without_uk_credentials() {
    let (status, body) = send(app(&AppConfig::default()), get("/tools")).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"get_departures"));
    assert!(names.contains(&"be_get_vehicle"));
    assert!(!names.contains(&"uk_live_departures"));

    let departures = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "get_departures")
        .unwrap();
    assert_eq!(departures["providers"], json!(["ch", "be"]));
    assert_eq!(departures["inputSchema"]["required"], json!(["station"]));
}

#[tokio::test]
async fn providers_report_disabled_reason() {
    let (status, body) = send(app(&AppConfig::default()), get("/providers")).await;
    assert_eq!(status, StatusCode::OK);

    let providers = body["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 3);
    assert_eq!(providers[0]["id"], "ch");
    assert_eq!(providers[0]["enabled"], true);

    let uk = &providers[2];
    assert_eq!(uk["id"], "uk");
    assert_eq!(uk["enabled"], false);
    assert!(uk["reason"].as_str().unwrap().contains("UK_TRANSPORT_APP_ID"));
}

#[tokio::test]
async fn unknown_tool_is_404() {
    let (status, body) = send(
        app(&AppConfig::default()),
        post("/tools/get_weather", "{}"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("get_weather"));
}

#[tokio::test]
async fn disabled_provider_tool_is_404() {
    let (status, _) = send(
        app(&AppConfig::default()),
        post("/tools/uk_live_departures", r#"{"station": "PAD"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_arguments_are_400() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let config = mocked(&server);

    let (status, _) = send(app(&config), post("/tools/get_departures", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app(&config),
        post("/tools/get_departures", r#"{"station": "Bern", "colour": "red"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app(&config), post("/tools/get_departures", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("JSON"));

    let (status, body) = send(
        app(&config),
        post(
            "/tools/be_get_departures",
            r#"{"station": "Gent-Sint-Pieters", "providers": ["be"]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("providers"));

    let (status, _) = send(
        app(&config),
        post(
            "/tools/search_connections",
            r#"{"origin": "Bern", "destination": "bern"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn partial_success_is_200_with_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stationboard"))
        .and(query_param("station", "Bern"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"station": {"id": "8507000", "name": "Bern"},
                "stationboard": [
                    {"stop": {"station": {"id": "8507000", "name": "Bern"}, "departure": "2024-03-15T11:00:00+0100"},
                     "category": "IC", "number": "1", "to": "Zürich HB"}
                ]}"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/liveboard/"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"error": 404, "message": "Could not find station Bern"}"#,
        ))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&mocked(&server)),
        post("/tools/get_departures", r#"{"station": "Bern"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["provider"], "ch");
    assert_eq!(results[0]["scheduled_time"], "2024-03-15T10:00:00Z");
    assert_eq!(results[0]["delay_minutes"], Value::Null);

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["provider"], "be");
    assert_eq!(errors[0]["capability"], "departures");
    assert_eq!(errors[0]["kind"], "upstream_error");
}

#[tokio::test]
async fn pinned_tool_only_calls_its_provider() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stations/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"station": [
                {"id": "BE.NMBS.008892007", "name": "Ghent-Sint-Pieters", "standardname": "Gent-Sint-Pieters",
                 "locationX": "3.710675", "locationY": "51.035896"}
            ]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"stations": []}"#))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&mocked(&server)),
        post("/tools/be_search_stations", r#"{"query": "gent"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["stop_name"], "Ghent-Sint-Pieters");
    assert_eq!(body["results"][0]["coordinates"]["latitude"], 51.035896);
    assert_eq!(body["errors"], json!([]));
}
