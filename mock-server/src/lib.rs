//! In-memory stand-in for the APISIX Admin and Control APIs.
//!
//! Serves the same wire contract the client speaks: `X-API-KEY` auth on the
//! admin surface, `{"node": {"nodes": [...]}}` list envelopes, `{"key",
//! "value"}` item bodies and `{"error_msg": ...}` errors. State lives in a
//! single map shared by both surfaces, so writes made through the admin API
//! show up in the control API's read-only mirrors.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const COLLECTIONS: &[&str] = &[
    "routes",
    "services",
    "consumers",
    "upstreams",
    "ssl",
    "global_rules",
    "consumer_groups",
    "plugin_configs",
    "plugin_metadata",
    "stream_routes",
    "secrets",
    "protos",
];

/// (name, priority, available in the stream subsystem)
const PLUGINS: &[(&str, i64, bool)] = &[
    ("ip-restriction", 3000, true),
    ("key-auth", 2500, false),
    ("proxy-rewrite", 1008, false),
    ("limit-count", 1002, true),
    ("prometheus", 500, true),
];

const DISCOVERY: &[&str] = &["consul", "dns", "eureka", "kubernetes", "nacos"];

/// Collection path -> id -> stored object.
type Store = BTreeMap<String, BTreeMap<String, Value>>;

pub struct AppState {
    api_key: Option<String>,
    store: RwLock<Store>,
}

pub type Db = Arc<AppState>;

pub fn app(api_key: Option<String>) -> Router {
    let state: Db = Arc::new(AppState {
        api_key,
        store: RwLock::new(Store::new()),
    });
    Router::new()
        .route("/apisix/admin/{*path}", any(admin))
        .route("/apisix/v1/{*path}", any(control))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: Option<String>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error_msg": message.into() }))).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Key not found")
}

fn envelope(nodes: Vec<Value>) -> Value {
    json!({ "node": { "nodes": nodes } })
}

fn item(collection: &str, id: &str, value: &Value) -> Value {
    json!({ "key": format!("/apisix/{collection}/{id}"), "value": value })
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

/// Where an admin path points inside the store.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    /// A collection, optionally narrowed to ids starting with `filter/`.
    Collection { name: String, filter: Option<String> },
    Item {
        collection: String,
        id: String,
        sub_path: Vec<String>,
    },
}

/// Query parameters the admin surface understands. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct AdminQuery {
    ttl: Option<String>,
    all: Option<String>,
    subsystem: Option<String>,
}

fn target(segments: &[&str]) -> Option<Target> {
    let first = *segments.first()?;
    if !COLLECTIONS.contains(&first) {
        return None;
    }

    let (collection, rest) = if first == "consumers" && segments.get(2) == Some(&"credentials") {
        (segments[..3].join("/"), &segments[3..])
    } else {
        (first.to_string(), &segments[1..])
    };
    let depth = if first == "secrets" { 2 } else { 1 };

    if rest.is_empty() {
        return Some(Target::Collection {
            name: collection,
            filter: None,
        });
    }
    if rest.len() < depth {
        return Some(Target::Collection {
            name: collection,
            filter: Some(rest.join("/")),
        });
    }
    Some(Target::Item {
        collection,
        id: rest[..depth].join("/"),
        sub_path: rest[depth..].iter().map(|s| s.to_string()).collect(),
    })
}

async fn admin(
    State(state): State<Db>,
    method: Method,
    Path(path): Path<String>,
    Query(query): Query<AdminQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    tracing::debug!(%method, %path, "admin request");

    if let Some(expected) = &state.api_key {
        let given = headers.get("x-api-key").and_then(|v| v.to_str().ok());
        if given != Some(expected.as_str()) {
            return error(StatusCode::UNAUTHORIZED, "failed to check token");
        }
    }
    if let Some(ttl) = &query.ttl {
        if ttl.parse::<u64>().is_err() {
            return error(StatusCode::BAD_REQUEST, format!("invalid ttl: {ttl}"));
        }
    }
    let body: Option<Value> = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => Some(value),
            Err(e) => return error(StatusCode::BAD_REQUEST, format!("invalid request body: {e}")),
        }
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match (segments.as_slice(), &method) {
        (["plugins", "list"], &Method::GET) => {
            Json(envelope(PLUGINS.iter().map(|(name, _, _)| json!(name)).collect())).into_response()
        }
        (["plugins", "reload"], &Method::PUT) => Json(json!({ "message": "done" })).into_response(),
        (["plugins"], &Method::GET) => all_plugins(&query),
        (["plugins", name], &Method::GET) => plugin(name, query.subsystem.as_deref()),
        (["schema", "validate", resource], &Method::POST) => validate(resource, body),
        _ => match target(&segments) {
            Some(target) => resource(&state, method, target, body).await,
            None => not_found(),
        },
    }
}

fn plugin_schema(priority: i64) -> Value {
    json!({ "priority": priority, "schema": { "type": "object" } })
}

fn all_plugins(query: &AdminQuery) -> Response {
    if query.all.as_deref() != Some("true") {
        return error(StatusCode::BAD_REQUEST, "missing all=true");
    }
    let stream_only = match query.subsystem.as_deref() {
        None | Some("http") => false,
        Some("stream") => true,
        Some(other) => return error(StatusCode::BAD_REQUEST, format!("unknown subsystem: {other}")),
    };
    let plugins: Map<String, Value> = PLUGINS
        .iter()
        .filter(|(_, _, stream)| !stream_only || *stream)
        .map(|(name, priority, _)| (name.to_string(), plugin_schema(*priority)))
        .collect();
    Json(Value::Object(plugins)).into_response()
}

fn plugin(name: &str, subsystem: Option<&str>) -> Response {
    match PLUGINS.iter().find(|(n, _, _)| *n == name) {
        Some((_, _, false)) if subsystem == Some("stream") => not_found(),
        Some((_, priority, _)) => Json(plugin_schema(*priority)).into_response(),
        None => not_found(),
    }
}

fn validate(resource: &str, body: Option<Value>) -> Response {
    let Some(Value::Object(config)) = body else {
        return error(StatusCode::BAD_REQUEST, "invalid configuration: expected a JSON object");
    };
    if !COLLECTIONS.contains(&resource) {
        return error(StatusCode::BAD_REQUEST, format!("unknown resource: {resource}"));
    }
    if resource == "routes" && !config.contains_key("uri") && !config.contains_key("uris") {
        return error(
            StatusCode::BAD_REQUEST,
            "invalid configuration: value should match only one schema, but matches none",
        );
    }
    Json(json!({ "message": "passed" })).into_response()
}

async fn resource(state: &AppState, method: Method, target: Target, body: Option<Value>) -> Response {
    match (method, target) {
        (Method::GET, Target::Collection { name, filter }) => {
            let store = state.store.read().await;
            let nodes = store
                .get(&name)
                .into_iter()
                .flatten()
                .filter(|(id, _)| match &filter {
                    Some(prefix) => id.starts_with(&format!("{prefix}/")),
                    None => true,
                })
                .map(|(id, value)| item(&name, id, value))
                .collect();
            Json(envelope(nodes)).into_response()
        }
        (Method::POST, Target::Collection { name, filter: None }) => {
            let Some(Value::Object(object)) = body else {
                return bad_object();
            };
            let id = if name == "consumers" {
                match object.get("username").and_then(Value::as_str) {
                    Some(username) => username.to_string(),
                    None => return error(StatusCode::BAD_REQUEST, "missing username"),
                }
            } else {
                Uuid::new_v4().simple().to_string()
            };
            let (status, value) = put(state, &name, &id, object).await;
            (status, Json(item(&name, &id, &value))).into_response()
        }
        (Method::PUT, Target::Collection { name, filter }) => {
            let Some(Value::Object(object)) = body else {
                return bad_object();
            };
            let key = if name == "consumers" { "username" } else { "id" };
            let Some(id) = object.get(key).and_then(Value::as_str).map(str::to_string) else {
                return error(StatusCode::BAD_REQUEST, format!("missing {key}"));
            };
            let id = match filter {
                Some(prefix) => format!("{prefix}/{id}"),
                None => id,
            };
            let (status, value) = put(state, &name, &id, object).await;
            (status, Json(item(&name, &id, &value))).into_response()
        }
        (method, Target::Item { collection, id, sub_path }) => {
            item_request(state, method, &collection, &id, &sub_path, body).await
        }
        _ => error(StatusCode::METHOD_NOT_ALLOWED, "not allowed"),
    }
}

fn bad_object() -> Response {
    error(StatusCode::BAD_REQUEST, "invalid configuration: expected a JSON object")
}

/// Store `object` under `collection/id`, returning 201 when new.
async fn put(state: &AppState, collection: &str, id: &str, mut object: Map<String, Value>) -> (StatusCode, Value) {
    object.insert("id".to_string(), json!(id));
    let value = Value::Object(object);
    let mut store = state.store.write().await;
    let previous = store
        .entry(collection.to_string())
        .or_default()
        .insert(id.to_string(), value.clone());
    let status = if previous.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (status, value)
}

async fn item_request(
    state: &AppState,
    method: Method,
    collection: &str,
    id: &str,
    sub_path: &[String],
    body: Option<Value>,
) -> Response {
    match method {
        Method::GET if sub_path.is_empty() => {
            let store = state.store.read().await;
            match store.get(collection).and_then(|items| items.get(id)) {
                Some(value) => Json(item(collection, id, value)).into_response(),
                None => not_found(),
            }
        }
        Method::PUT if sub_path.is_empty() => {
            let Some(Value::Object(object)) = body else {
                return bad_object();
            };
            let (status, value) = put(state, collection, id, object).await;
            (status, Json(item(collection, id, &value))).into_response()
        }
        Method::PATCH => {
            let Some(patch) = body else {
                return bad_object();
            };
            let mut store = state.store.write().await;
            let Some(current) = store.get_mut(collection).and_then(|items| items.get_mut(id)) else {
                return not_found();
            };
            if sub_path.is_empty() {
                if !patch.is_object() {
                    return bad_object();
                }
                merge_patch(current, &patch);
            } else {
                set_at(current, sub_path, patch);
            }
            if let Value::Object(object) = current {
                object.insert("id".to_string(), json!(id));
            }
            Json(item(collection, id, current)).into_response()
        }
        Method::DELETE if sub_path.is_empty() => {
            let mut store = state.store.write().await;
            match store.get_mut(collection).and_then(|items| items.remove(id)) {
                Some(_) => Json(json!({
                    "deleted": "1",
                    "key": format!("/apisix/{collection}/{id}"),
                }))
                .into_response(),
                None => not_found(),
            }
        }
        Method::GET | Method::DELETE => not_found(),
        _ => error(StatusCode::METHOD_NOT_ALLOWED, "not allowed"),
    }
}

/// JSON merge patch: objects merge recursively, `null` removes.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(object) = target {
        for (key, value) in patch {
            if value.is_null() {
                object.remove(key);
            } else {
                merge_patch(object.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

/// Replace the value at `path`, creating intermediate objects.
pub fn set_at(target: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *target = value;
        return;
    };
    let mut current = target;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(object) = current.as_object_mut() else {
            return;
        };
        current = object
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Some(object) = current.as_object_mut() {
        object.insert(last.clone(), value);
    }
}

// ---------------------------------------------------------------------------
// Control surface
// ---------------------------------------------------------------------------

async fn control(State(state): State<Db>, method: Method, Path(path): Path<String>) -> Response {
    tracing::debug!(%method, %path, "control request");

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match (segments.as_slice(), &method) {
        (["schema"], &Method::GET) => Json(schema()).into_response(),
        (["healthcheck"], &Method::GET) => Json(json!([])).into_response(),
        (["gc"], &Method::POST) => Json(json!({})).into_response(),
        (["plugins", "reload"], &Method::PUT) => Json(json!({ "message": "done" })).into_response(),
        (["routes"], &Method::GET) => mirror_list(&state, "routes").await,
        (["route", id], &Method::GET) => mirror_get(&state, "routes", id).await,
        (["services"], &Method::GET) => mirror_list(&state, "services").await,
        (["service", id], &Method::GET) => mirror_get(&state, "services", id).await,
        (["upstreams"], &Method::GET) => mirror_list(&state, "upstreams").await,
        (["upstream", id], &Method::GET) => mirror_get(&state, "upstreams", id).await,
        (["plugin_metadatas"], &Method::GET) => mirror_list(&state, "plugin_metadata").await,
        (["plugin_metadata", name], &Method::GET) => {
            mirror_get(&state, "plugin_metadata", name).await
        }
        (["discovery", service, "dump"], &Method::GET) if DISCOVERY.contains(service) => {
            Json(json!({ "services": {}, "config": { "name": service } })).into_response()
        }
        (["discovery", service, "show_dump_file"], &Method::GET) if DISCOVERY.contains(service) => {
            Json(json!({ "services": {}, "expire": 0, "last_update": 0 })).into_response()
        }
        _ => not_found(),
    }
}

fn schema() -> Value {
    let plugins: Map<String, Value> = PLUGINS
        .iter()
        .map(|(name, priority, _)| (name.to_string(), plugin_schema(*priority)))
        .collect();
    json!({
        "main": {
            "route": { "type": "object" },
            "service": { "type": "object" },
            "upstream": { "type": "object" },
        },
        "plugins": plugins,
        "stream_plugins": {},
    })
}

async fn mirror_list(state: &AppState, collection: &str) -> Response {
    let store = state.store.read().await;
    let nodes = store
        .get(collection)
        .into_iter()
        .flat_map(|items| items.values().cloned())
        .collect();
    Json(envelope(nodes)).into_response()
}

async fn mirror_get(state: &AppState, collection: &str, id: &str) -> Response {
    let store = state.store.read().await;
    match store.get(collection).and_then(|items| items.get(id)) {
        Some(value) => Json(value.clone()).into_response(),
        None => not_found(),
    }
}
