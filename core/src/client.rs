//! The generic REST dispatcher behind the Admin and Control clients.
//!
//! # Design
//! `ResourceClient` holds only immutable configuration plus a shared
//! transport. A call is split the same way at every level:
//! `build_request` resolves the path template and produces a plain-data
//! `HttpRequest` without touching the network, the `Transport` performs the
//! one round-trip, and `parse_response` turns the `HttpResponse` into JSON
//! or a typed error. Callers that do their own I/O can use the two pure
//! halves directly.
//!
//! `call*` methods take an `Endpoint` descriptor and check the call against
//! it; `invoke*` methods take a raw verb and template.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::endpoint::{Catalogue, Endpoint};
use crate::error::ApiError;
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, API_KEY_HEADER, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE,
};
use crate::path::{self, Query};
use crate::transport::{Transport, UreqTransport};

/// Maximum length of response body to log.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Stateless dispatcher bound to one base URL and one catalogue.
#[derive(Clone)]
pub struct ResourceClient {
    base_url: String,
    api_key: Option<String>,
    catalogue: &'static Catalogue,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.base_url)
            .field("catalogue", &self.catalogue.name)
            .finish_non_exhaustive()
    }
}

impl ResourceClient {
    /// Client using the blocking ureq transport with the configured timeout.
    pub fn new(config: &ClientConfig, catalogue: &'static Catalogue) -> Result<Self, ApiError> {
        let transport = Arc::new(UreqTransport::new(config.timeout()));
        Self::with_transport(config, catalogue, transport)
    }

    pub fn with_transport(
        config: &ClientConfig,
        catalogue: &'static Catalogue,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        config.validate()?;
        Ok(Self {
            base_url: config.normalized_base_url().to_string(),
            api_key: config.api_key.clone(),
            catalogue,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn catalogue(&self) -> &'static Catalogue {
        self.catalogue
    }

    // -----------------------------------------------------------------------
    // Pure halves
    // -----------------------------------------------------------------------

    /// Resolve `template` against `params` and describe the request.
    ///
    /// Fails before any I/O if a placeholder is missing or a body is given
    /// for a verb that does not accept one.
    pub fn build_request(
        &self,
        method: HttpMethod,
        template: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
        query: &Query,
    ) -> Result<HttpRequest, ApiError> {
        if body.is_some() && !method.accepts_body() {
            return Err(ApiError::InvalidRequest(format!(
                "{method} requests cannot carry a body"
            )));
        }

        let resolved = path::resolve(template, params)?;
        let url = query.apply(path::join(&self.base_url, &resolved));

        let mut headers = Vec::with_capacity(2);
        if let Some(key) = &self.api_key {
            headers.push((API_KEY_HEADER.to_string(), key.clone()));
        }
        let body = match body {
            Some(value) => {
                headers.push((CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()));
                Some(serde_json::to_string(value).map_err(ApiError::Serialization)?)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Parse a 2xx body as JSON, returned unchanged. An empty body is
    /// `Value::Null`; bytes that are not JSON (or not UTF-8) are `Decode`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(ApiError::Decode)
    }

    /// `parse_response` followed by envelope unwrapping.
    pub fn parse_list_response(&self, response: HttpResponse) -> Result<Vec<Value>, ApiError> {
        self.parse_response(response).map(unwrap_nodes)
    }

    // -----------------------------------------------------------------------
    // Raw verb + template
    // -----------------------------------------------------------------------

    /// Perform exactly one request and return the parsed JSON body.
    pub fn invoke(
        &self,
        method: HttpMethod,
        template: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
        query: &Query,
    ) -> Result<Value, ApiError> {
        let request = self.build_request(method, template, params, body, query)?;
        let response = self.execute(request)?;
        self.parse_response(response)
    }

    /// `invoke` with a textual verb; unknown verbs fail before any I/O.
    pub fn invoke_verb(
        &self,
        verb: &str,
        template: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
        query: &Query,
    ) -> Result<Value, ApiError> {
        let method: HttpMethod = verb.parse()?;
        self.invoke(method, template, params, body, query)
    }

    /// `invoke` for collection endpoints. A response without the
    /// `node.nodes` envelope is an empty list, not an error.
    pub fn invoke_list(
        &self,
        method: HttpMethod,
        template: &str,
        params: &[(&str, &str)],
        query: &Query,
    ) -> Result<Vec<Value>, ApiError> {
        self.invoke(method, template, params, None, query)
            .map(unwrap_nodes)
    }

    // -----------------------------------------------------------------------
    // Descriptor driven
    // -----------------------------------------------------------------------

    /// Dispatch `endpoint`, checking the call against the descriptor.
    pub fn call(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
        body: Option<&Value>,
        query: Query,
    ) -> Result<Value, ApiError> {
        let query = check_call(endpoint, body, query)?;
        self.invoke(endpoint.method, endpoint.path, params, body, &query)
    }

    pub fn call_list(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
        query: Query,
    ) -> Result<Vec<Value>, ApiError> {
        self.call(endpoint, params, None, query).map(unwrap_nodes)
    }

    /// Dispatch the catalogue endpoint called `name`. List endpoints
    /// return the unwrapped nodes as a JSON array.
    pub fn call_named(
        &self,
        name: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
        query: Query,
    ) -> Result<Value, ApiError> {
        let endpoint = self.catalogue.get(name).ok_or_else(|| {
            ApiError::InvalidRequest(format!(
                "unknown endpoint `{name}` in the {} catalogue",
                self.catalogue.name
            ))
        })?;
        let value = self.call(endpoint, params, body, query)?;
        if endpoint.list {
            Ok(Value::Array(unwrap_nodes(value)))
        } else {
            Ok(value)
        }
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending APISIX request");

        let response =
            self.transport
                .execute(&request)
                .map_err(|source| ApiError::Connectivity {
                    method: request.method,
                    url: request.url.clone(),
                    source,
                })?;

        if !response.is_success() {
            tracing::debug!(
                status = response.status,
                body = %sanitize_for_log(&response.text()),
                "APISIX returned an error status"
            );
        }
        Ok(response)
    }
}

/// Merge descriptor query pairs with the caller's and validate flags.
fn check_call(endpoint: &Endpoint, body: Option<&Value>, query: Query) -> Result<Query, ApiError> {
    match (endpoint.body, body.is_some()) {
        (true, false) => {
            return Err(ApiError::InvalidRequest(format!(
                "`{}` requires a request body",
                endpoint.name
            )))
        }
        (false, true) => {
            return Err(ApiError::InvalidRequest(format!(
                "`{}` does not accept a request body",
                endpoint.name
            )))
        }
        _ => {}
    }
    if !endpoint.ttl && query.contains_key("ttl") {
        return Err(ApiError::InvalidRequest(format!(
            "`{}` does not accept a ttl",
            endpoint.name
        )));
    }
    Ok(query.prepend(endpoint.query))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.text().into_owned(),
    })
}

/// Extract `node.nodes` from a list response. Anything else is an empty
/// list.
pub fn unwrap_nodes(value: Value) -> Vec<Value> {
    match value {
        Value::Object(mut top) => match top.remove("node") {
            Some(Value::Object(mut node)) => match node.remove("nodes") {
                Some(Value::Array(nodes)) => nodes,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Truncate and strip control characters.
fn sanitize_for_log(body: &str) -> String {
    let mut out: String = body
        .chars()
        .take(MAX_LOG_BODY_LENGTH)
        .filter(|c| !c.is_control())
        .collect();
    if body.chars().count() > MAX_LOG_BODY_LENGTH {
        out.push_str(&format!("... [truncated, {} bytes total]", body.len()));
    }
    out
}
