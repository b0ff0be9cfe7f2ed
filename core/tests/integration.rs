//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread, then
//! drives the blocking Admin and Control clients over real HTTP. Validates
//! URL construction, auth headers, envelope unwrapping and error mapping
//! with an actual server on the other end.

use std::io::{Read, Write};
use std::net::SocketAddr;

use apisix_client::{
    AdminClient, ApiError, ClientConfig, ControlClient, HttpMethod, Query, TransportErrorKind,
};
use serde_json::json;

const API_KEY: &str = "edd1c9f034335f136f87ad84b625c8f1";

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            apisix_mock_server::run(listener, Some(API_KEY.to_string())).await
        })
        .unwrap();
    });

    addr
}

/// Answer exactly one connection with a fixed raw response.
fn serve_raw_once(status_line: &'static str, body: &'static [u8]) -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf);
        let head = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
    });

    addr
}

fn admin(addr: SocketAddr) -> AdminClient {
    // Trailing slash on purpose: it must not produce `//` in request URLs.
    AdminClient::new(&format!("http://{addr}/apisix/admin/"), API_KEY).unwrap()
}

fn control(addr: SocketAddr) -> ControlClient {
    ControlClient::new(&format!("http://{addr}/apisix/v1"), API_KEY).unwrap()
}

#[test]
fn route_lifecycle() {
    let addr = start_server();
    let admin = admin(addr);

    // Step 1: list, should be empty.
    assert!(admin.list_routes().unwrap().is_empty());

    // Step 2: create with id and a ttl.
    let created = admin
        .create_route_with_id("r1", &json!({"uri": "/hello", "upstream_id": "u1"}), Some(60))
        .unwrap();
    assert_eq!(created["key"], "/apisix/routes/r1");

    // Step 3: get returns the id we chose.
    let fetched = admin.get_route("r1").unwrap();
    assert_eq!(fetched["value"]["id"], "r1");
    assert_eq!(fetched["value"]["uri"], "/hello");

    // Step 4: merge patch, null removes.
    let patched = admin
        .update_route("r1", &json!({"upstream_id": null, "desc": "hi"}), None)
        .unwrap();
    assert_eq!(patched["value"]["desc"], "hi");
    assert!(patched["value"].get("upstream_id").is_none());

    // Step 5: replace one attribute by path.
    let patched = admin
        .update_route_with_path("r1", "plugins", &json!({"limit-count": {"count": 2}}), None)
        .unwrap();
    assert_eq!(patched["value"]["plugins"]["limit-count"]["count"], 2);
    assert_eq!(patched["value"]["uri"], "/hello");

    // Step 6: create with a server-assigned id.
    let random = admin.create_route(&json!({"uri": "/other"}), None).unwrap();
    let random_id = random["value"]["id"].as_str().unwrap().to_string();
    assert_ne!(random_id, "r1");

    // Step 7: list, two routes.
    assert_eq!(admin.list_routes().unwrap().len(), 2);

    // Step 8: delete both.
    admin.delete_route("r1").unwrap();
    admin.delete_route(&random_id).unwrap();

    // Step 9: get after delete is a 404 with the server message.
    let err = admin.get_route("r1").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.error_message().as_deref(), Some("Key not found"));

    // Step 10: list, empty again.
    assert!(admin.list_routes().unwrap().is_empty());
}

#[test]
fn resource_families_round_trip() {
    let addr = start_server();
    let admin = admin(addr);

    let upstream = json!({"type": "roundrobin", "nodes": {"127.0.0.1:1980": 1}});
    admin.create_upstream_with_id("u1", &upstream).unwrap();
    assert_eq!(admin.get_upstream("u1").unwrap()["value"]["type"], "roundrobin");

    admin.create_service_with_id("s1", &json!({"upstream_id": "u1"})).unwrap();
    admin.update_service("s1", &json!({"name": "svc"})).unwrap();
    assert_eq!(admin.get_service("s1").unwrap()["value"]["name"], "svc");

    admin.create_consumer(&json!({"username": "jack"})).unwrap();
    admin
        .create_or_update_consumer_credential("jack", "c1", &json!({"plugins": {"key-auth": {"key": "k"}}}))
        .unwrap();
    let credentials = admin.list_consumer_credentials("jack").unwrap();
    assert_eq!(credentials.len(), 1);
    assert_eq!(credentials[0]["value"]["id"], "c1");
    admin.delete_consumer_credential("jack", "c1").unwrap();
    assert!(admin.get_consumer_credential("jack", "c1").unwrap_err().is_not_found());

    admin.create_secret("vault", "s1", &json!({"uri": "http://vault:8200"})).unwrap();
    admin
        .update_secret_with_path("vault", "s1", "token", &json!("root"))
        .unwrap();
    let secret = admin.get_secret("vault", "s1").unwrap();
    assert_eq!(secret["key"], "/apisix/secrets/vault/s1");
    assert_eq!(secret["value"]["token"], "root");
    assert_eq!(admin.list_secrets().unwrap().len(), 1);

    admin.create_plugin_metadata("http-logger", &json!({"log_format": {}})).unwrap();
    admin.create_global_rule_with_id("g1", &json!({"plugins": {}})).unwrap();
    admin.create_consumer_group_with_id("cg1", &json!({"plugins": {}})).unwrap();
    admin.create_plugin_config_with_id("pc1", &json!({"plugins": {}})).unwrap();
    admin.create_stream_route_with_id("sr1", &json!({"upstream_id": "u1"})).unwrap();
    admin.create_proto_with_id("p1", &json!({"content": "syntax = \"proto3\";"})).unwrap();
    admin.update_ssl("ssl1", &json!({"snis": ["example.com"]})).unwrap();

    assert_eq!(admin.list_global_rules().unwrap().len(), 1);
    assert_eq!(admin.list_consumer_groups().unwrap().len(), 1);
    assert_eq!(admin.list_plugin_configs().unwrap().len(), 1);
    assert_eq!(admin.list_stream_routes().unwrap().len(), 1);
    assert_eq!(admin.list_protos().unwrap().len(), 1);
    assert_eq!(admin.list_ssl().unwrap().len(), 1);
}

#[test]
fn plugins_and_schema_validation() {
    let addr = start_server();
    let admin = admin(addr);

    let plugins = admin.list_plugins().unwrap();
    assert!(plugins.contains(&json!("limit-count")));

    let all = admin.get_all_plugins_properties().unwrap();
    assert!(all.get("key-auth").is_some());
    let stream = admin.get_all_stream_plugins_properties().unwrap();
    assert!(stream.get("key-auth").is_none());

    assert!(admin.get_plugin_properties("limit-count", Some("stream")).is_ok());
    assert!(admin
        .get_plugin_properties("key-auth", Some("stream"))
        .unwrap_err()
        .is_not_found());

    assert_eq!(admin.reload_plugins().unwrap()["message"], "done");

    assert!(admin.validate_resource_schema("routes", &json!({"uri": "/a"})).is_ok());
    let err = admin
        .validate_resource_schema("routes", &json!({"methods": ["GET"]}))
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[test]
fn control_surface_reads_admin_state() {
    let addr = start_server();
    let admin = admin(addr);
    let control = control(addr);

    admin.create_route_with_id("r1", &json!({"uri": "/a"}), None).unwrap();
    admin.create_upstream_with_id("u1", &json!({"type": "chash"})).unwrap();

    let routes = control.list_routes().unwrap();
    assert_eq!(routes, vec![json!({"id": "r1", "uri": "/a"})]);
    assert_eq!(control.get_route("r1").unwrap()["uri"], "/a");
    assert_eq!(control.get_upstream("u1").unwrap()["type"], "chash");
    assert!(control.list_services().unwrap().is_empty());
    assert!(control.list_plugin_metadatas().unwrap().is_empty());

    assert!(control.healthcheck().unwrap().is_array());
    assert!(control.get_schema().unwrap().get("main").is_some());
    control.trigger_gc().unwrap();
    assert_eq!(control.reload_plugins().unwrap()["message"], "done");
    assert!(control.get_discovery_dump("nacos").is_ok());
    assert!(control.show_discovery_dump_file("nacos").is_ok());
    assert!(control.get_discovery_dump("zookeeper").unwrap_err().is_not_found());
}

#[test]
fn generic_invoke_and_named_calls() {
    let addr = start_server();
    let admin = admin(addr);
    let client = admin.resource_client();

    let created = client
        .invoke(
            HttpMethod::Put,
            "/routes/{id}",
            &[("id", "r9")],
            Some(&json!({"uri": "/foo"})),
            &Query::new().ttl(Some(60)),
        )
        .unwrap();
    assert_eq!(created["value"]["uri"], "/foo");

    let listed = client
        .invoke_list(HttpMethod::Get, "routes", &[], &Query::new())
        .unwrap();
    assert_eq!(listed.len(), 1);

    let named = client
        .call_named("routes.get", &[("id", "r9")], None, Query::new())
        .unwrap();
    assert_eq!(named["value"]["id"], "r9");

    let deleted = client
        .invoke_verb("delete", "routes/{id}", &[("id", "r9")], None, &Query::new())
        .unwrap();
    assert_eq!(deleted["deleted"], "1");
}

#[test]
fn wrong_api_key_is_an_http_status_error() {
    let addr = start_server();
    let admin = AdminClient::new(&format!("http://{addr}/apisix/admin"), "wrong").unwrap();

    let err = admin.list_routes().unwrap_err();
    match err {
        ApiError::HttpStatus { status, ref body } => {
            assert_eq!(status, 401);
            assert!(body.contains("failed to check token"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unreachable_host_is_a_connectivity_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let config = ClientConfig::new(format!("http://{addr}/apisix/admin"))
        .with_api_key(API_KEY)
        .with_timeout(std::time::Duration::from_secs(5));
    let admin = AdminClient::from_config(&config).unwrap();

    let err = admin.get_route("r1").unwrap_err();
    match err {
        ApiError::Connectivity { method, url, source } => {
            assert_eq!(method, HttpMethod::Get);
            assert_eq!(url, format!("http://{addr}/apisix/admin/routes/r1"));
            assert_ne!(source.kind(), TransportErrorKind::Timeout);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_utf8_success_body_is_a_decode_error() {
    let addr = serve_raw_once("200 OK", b"\xff\xfe not json");

    let err = admin(addr).get_route("r1").unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "unexpected error: {err:?}");
}

#[test]
fn non_utf8_error_page_keeps_the_status() {
    let addr = serve_raw_once("502 Bad Gateway", b"<html>\xe9chec</html>");

    let err = admin(addr).list_routes().unwrap_err();
    assert_eq!(err.status(), Some(502));
    match err {
        ApiError::HttpStatus { body, .. } => assert!(body.contains("chec</html>")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn ids_with_reserved_characters_round_trip() {
    let addr = start_server();
    let admin = admin(addr);

    admin.create_route_with_id("a b", &json!({"uri": "/spaced"}), None).unwrap();
    admin.create_route_with_id("x?ttl=1#y", &json!({"uri": "/odd"}), None).unwrap();

    assert_eq!(admin.get_route("a b").unwrap()["value"]["uri"], "/spaced");
    assert_eq!(admin.get_route("x?ttl=1#y").unwrap()["value"]["id"], "x?ttl=1#y");
    assert_eq!(admin.list_routes().unwrap().len(), 2);
}
