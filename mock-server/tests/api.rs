use apisix_mock_server::app;
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: Option<&str>) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-KEY", KEY);
    if body.is_some() {
        builder = builder.header(http::header::CONTENT_TYPE, "application/json");
    }
    builder.body(body.unwrap_or_default().to_string()).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request(method, uri, body)).await.unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

fn admin() -> Router {
    app(Some(KEY.to_string()))
}

// --- auth ---

#[tokio::test]
async fn missing_api_key_returns_401() {
    let resp = admin()
        .oneshot(
            Request::builder()
                .uri("/apisix/admin/routes")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error_msg"], "failed to check token");
}

#[tokio::test]
async fn no_key_configured_accepts_anything() {
    let resp = app(None)
        .oneshot(
            Request::builder()
                .uri("/apisix/admin/routes")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- list ---

#[tokio::test]
async fn list_routes_empty_envelope() {
    let (status, body) = send(&admin(), "GET", "/apisix/admin/routes", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"node": {"nodes": []}}));
}

// --- create ---

#[tokio::test]
async fn put_creates_then_replaces() {
    let app = admin();
    let (status, body) = send(&app, "PUT", "/apisix/admin/routes/r1", Some(r#"{"uri":"/a"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["key"], "/apisix/routes/r1");
    assert_eq!(body["value"], json!({"id": "r1", "uri": "/a"}));

    let (status, body) = send(&app, "PUT", "/apisix/admin/routes/r1", Some(r#"{"uri":"/b"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["uri"], "/b");
}

#[tokio::test]
async fn post_assigns_an_id() {
    let app = admin();
    let (status, body) = send(&app, "POST", "/apisix/admin/upstreams", Some(r#"{"type":"roundrobin"}"#)).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["value"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["key"], format!("/apisix/upstreams/{id}"));
}

#[tokio::test]
async fn post_consumer_is_keyed_by_username() {
    let (status, body) = send(&admin(), "POST", "/apisix/admin/consumers", Some(r#"{"username":"jack"}"#)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["key"], "/apisix/consumers/jack");
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let (status, body) = send(&admin(), "PUT", "/apisix/admin/routes/r1", Some("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error_msg"].as_str().unwrap().starts_with("invalid request body"));
}

#[tokio::test]
async fn invalid_ttl_returns_400() {
    let (status, _) = send(&admin(), "PUT", "/apisix/admin/routes/r1?ttl=soon", Some("{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// --- get ---

#[tokio::test]
async fn get_missing_route_returns_404() {
    let (status, body) = send(&admin(), "GET", "/apisix/admin/routes/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_msg"], "Key not found");
}

#[tokio::test]
async fn unknown_collection_returns_404() {
    let resp = admin()
        .oneshot(request("GET", "/apisix/admin/widgets", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- patch ---

#[tokio::test]
async fn patch_merges_and_sub_path_replaces() {
    let app = admin();
    send(
        &app,
        "PUT",
        "/apisix/admin/services/s1",
        Some(r#"{"desc":"old","plugins":{"a":{}},"name":"svc"}"#),
    )
    .await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/apisix/admin/services/s1",
        Some(r#"{"desc":null,"name":"renamed"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], json!({"id": "s1", "name": "renamed", "plugins": {"a": {}}}));

    let (status, body) = send(
        &app,
        "PATCH",
        "/apisix/admin/services/s1/plugins",
        Some(r#"{"b":{"x":1}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["plugins"], json!({"b": {"x": 1}}));
}

#[tokio::test]
async fn patch_missing_returns_404() {
    let (status, _) = send(&admin(), "PATCH", "/apisix/admin/routes/nope", Some("{}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_then_delete_again() {
    let app = admin();
    send(&app, "PUT", "/apisix/admin/protos/p1", Some(r#"{"content":"syntax = \"proto3\";"}"#)).await;

    let (status, body) = send(&app, "DELETE", "/apisix/admin/protos/p1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "/apisix/protos/p1");

    let (status, _) = send(&app, "DELETE", "/apisix/admin/protos/p1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- nested keys ---

#[tokio::test]
async fn secrets_and_credentials_use_compound_keys() {
    let app = admin();
    send(&app, "PUT", "/apisix/admin/secrets/vault/s1", Some(r#"{"uri":"http://vault"}"#)).await;
    send(&app, "PUT", "/apisix/admin/secrets/aws/s2", Some(r#"{"region":"eu"}"#)).await;
    send(
        &app,
        "PUT",
        "/apisix/admin/consumers/jack/credentials/c1",
        Some(r#"{"plugins":{"key-auth":{"key":"k"}}}"#),
    )
    .await;

    let (_, body) = send(&app, "GET", "/apisix/admin/secrets", None).await;
    assert_eq!(body["node"]["nodes"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/apisix/admin/secrets/vault", None).await;
    let nodes = body["node"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["key"], "/apisix/secrets/vault/s1");

    let (_, body) = send(&app, "GET", "/apisix/admin/consumers/jack/credentials", None).await;
    assert_eq!(body["node"]["nodes"][0]["value"]["id"], "c1");
}

// --- plugins & schema ---

#[tokio::test]
async fn plugin_endpoints() {
    let app = admin();

    let (_, body) = send(&app, "GET", "/apisix/admin/plugins/list", None).await;
    assert!(body["node"]["nodes"].as_array().unwrap().contains(&json!("key-auth")));

    let (_, body) = send(&app, "GET", "/apisix/admin/plugins?all=true&subsystem=stream", None).await;
    assert!(body.get("limit-count").is_some());
    assert!(body.get("key-auth").is_none());

    let (status, _) = send(&app, "GET", "/apisix/admin/plugins/key-auth?subsystem=stream", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "PUT", "/apisix/admin/plugins/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "done");
}

#[tokio::test]
async fn schema_validation() {
    let app = admin();

    let (status, _) = send(&app, "POST", "/apisix/admin/schema/validate/routes", Some(r#"{"uri":"/a"}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/apisix/admin/schema/validate/routes", Some(r#"{"methods":["GET"]}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// --- control surface ---

#[tokio::test]
async fn control_mirrors_admin_writes() {
    let app = admin();
    send(&app, "PUT", "/apisix/admin/routes/r1", Some(r#"{"uri":"/a"}"#)).await;

    let (status, body) = send(&app, "GET", "/apisix/v1/routes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["node"]["nodes"], json!([{"id": "r1", "uri": "/a"}]));

    let (_, body) = send(&app, "GET", "/apisix/v1/route/r1", None).await;
    assert_eq!(body["uri"], "/a");

    let (status, _) = send(&app, "GET", "/apisix/v1/route/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn control_operational_endpoints() {
    let app = admin();

    let (status, body) = send(&app, "GET", "/apisix/v1/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let resp = app.clone().oneshot(request("POST", "/apisix/v1/gc", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await.as_ref(), b"{}");

    let (status, body) = send(&app, "GET", "/apisix/v1/discovery/eureka/dump", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["name"], "eureka");

    let (status, _) = send(&app, "GET", "/apisix/v1/discovery/unknown/dump", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
