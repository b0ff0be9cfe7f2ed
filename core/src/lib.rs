//! Blocking client for the Apache APISIX Admin and Control APIs.
//!
//! # Overview
//! Every public operation maps to exactly one REST call. A single generic
//! dispatcher, `ResourceClient`, turns an `Endpoint` descriptor (verb plus
//! path template) into one HTTP request and parses the JSON answer.
//! `AdminClient` and `ControlClient` are thin typed call sites over two
//! static catalogues of descriptors.
//!
//! # Design
//! - Configuration is immutable; clients are cheap to clone and share.
//! - Each call is split into `build_request` (pure), `Transport::execute`
//!   (the only I/O) and `parse_response` (pure), so the request shape and
//!   the error mapping are testable without a network.
//! - No retries, no caching. Every error surfaces from the single request
//!   that caused it.
//! - List endpoints unwrap the server's `{"node": {"nodes": [...]}}`
//!   envelope; a missing envelope is an empty list.
//!
//! ```no_run
//! use apisix_client::AdminClient;
//! use serde_json::json;
//!
//! let admin = AdminClient::new("http://127.0.0.1:9180/apisix/admin", "edd1c9f034335f136f87ad84b625c8f1")?;
//! admin.create_route_with_id("r1", &json!({"uri": "/hello", "upstream_id": "u1"}), Some(60))?;
//! for route in admin.list_routes()? {
//!     println!("{route}");
//! }
//! # Ok::<(), apisix_client::ApiError>(())
//! ```

pub mod admin;
pub mod client;
pub mod config;
pub mod control;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod path;
pub mod transport;

pub use admin::{AdminClient, ADMIN};
pub use client::{unwrap_nodes, ResourceClient};
pub use config::ClientConfig;
pub use control::{ControlClient, CONTROL};
pub use endpoint::{Catalogue, Endpoint};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use path::Query;
pub use transport::{Transport, TransportError, TransportErrorKind, UreqTransport};
