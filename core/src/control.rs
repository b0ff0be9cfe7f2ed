//! Typed client for the APISIX Control API.
//!
//! The Control API is read-mostly runtime introspection plus a couple of
//! operational triggers (plugin reload, garbage collection).

use std::sync::Arc;

use serde_json::Value;

use crate::client::ResourceClient;
use crate::config::ClientConfig;
use crate::endpoint::Catalogue;
use crate::error::ApiError;
use crate::path::Query;
use crate::transport::Transport;

/// Control API endpoint descriptors.
pub mod endpoints {
    use crate::endpoint::Endpoint;
    use crate::http::HttpMethod::{Post, Put};

    pub const SCHEMA_GET: Endpoint = Endpoint::get("schema.get", "schema");
    pub const HEALTHCHECK_GET: Endpoint = Endpoint::get("healthcheck.get", "healthcheck");
    pub const GC_TRIGGER: Endpoint = Endpoint::action("gc.trigger", Post, "gc");

    // Single-resource reads use the singular path segment.
    pub const ROUTES_LIST: Endpoint = Endpoint::list("routes.list", "routes");
    pub const ROUTES_GET: Endpoint = Endpoint::get("routes.get", "route/{id}");
    pub const SERVICES_LIST: Endpoint = Endpoint::list("services.list", "services");
    pub const SERVICES_GET: Endpoint = Endpoint::get("services.get", "service/{id}");
    pub const UPSTREAMS_LIST: Endpoint = Endpoint::list("upstreams.list", "upstreams");
    pub const UPSTREAMS_GET: Endpoint = Endpoint::get("upstreams.get", "upstream/{id}");
    pub const PLUGIN_METADATA_LIST: Endpoint =
        Endpoint::list("plugin_metadata.list", "plugin_metadatas");
    pub const PLUGIN_METADATA_GET: Endpoint =
        Endpoint::get("plugin_metadata.get", "plugin_metadata/{name}");

    pub const PLUGINS_RELOAD: Endpoint = Endpoint::action("plugins.reload", Put, "plugins/reload");

    pub const DISCOVERY_DUMP: Endpoint = Endpoint::get("discovery.dump", "discovery/{service}/dump");
    pub const DISCOVERY_DUMP_FILE: Endpoint =
        Endpoint::get("discovery.dump_file", "discovery/{service}/show_dump_file");

    pub(super) static ALL: [Endpoint; 14] = [
        SCHEMA_GET,
        HEALTHCHECK_GET,
        GC_TRIGGER,
        ROUTES_LIST,
        ROUTES_GET,
        SERVICES_LIST,
        SERVICES_GET,
        UPSTREAMS_LIST,
        UPSTREAMS_GET,
        PLUGIN_METADATA_LIST,
        PLUGIN_METADATA_GET,
        PLUGINS_RELOAD,
        DISCOVERY_DUMP,
        DISCOVERY_DUMP_FILE,
    ];
}

/// The Control API catalogue.
pub static CONTROL: Catalogue = Catalogue {
    name: "control",
    endpoints: &endpoints::ALL,
};

use endpoints::*;

/// Client for the Control API, mounted at e.g. `http://127.0.0.1:9090/apisix/v1`.
#[derive(Debug, Clone)]
pub struct ControlClient {
    inner: ResourceClient,
}

impl ControlClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig::new(base_url).with_api_key(api_key))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ResourceClient::new(config, &CONTROL)?,
        })
    }

    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ResourceClient::with_transport(config, &CONTROL, transport)?,
        })
    }

    pub fn resource_client(&self) -> &ResourceClient {
        &self.inner
    }

    pub fn get_schema(&self) -> Result<Value, ApiError> {
        self.inner.call(&SCHEMA_GET, &[], None, Query::new())
    }

    pub fn healthcheck(&self) -> Result<Value, ApiError> {
        self.inner.call(&HEALTHCHECK_GET, &[], None, Query::new())
    }

    pub fn trigger_gc(&self) -> Result<Value, ApiError> {
        self.inner.call(&GC_TRIGGER, &[], None, Query::new())
    }

    pub fn list_routes(&self) -> Result<Vec<Value>, ApiError> {
        self.inner.call_list(&ROUTES_LIST, &[], Query::new())
    }

    pub fn get_route(&self, route_id: &str) -> Result<Value, ApiError> {
        self.inner.call(&ROUTES_GET, &[("id", route_id)], None, Query::new())
    }

    pub fn list_services(&self) -> Result<Vec<Value>, ApiError> {
        self.inner.call_list(&SERVICES_LIST, &[], Query::new())
    }

    pub fn get_service(&self, service_id: &str) -> Result<Value, ApiError> {
        self.inner.call(&SERVICES_GET, &[("id", service_id)], None, Query::new())
    }

    pub fn list_upstreams(&self) -> Result<Vec<Value>, ApiError> {
        self.inner.call_list(&UPSTREAMS_LIST, &[], Query::new())
    }

    pub fn get_upstream(&self, upstream_id: &str) -> Result<Value, ApiError> {
        self.inner.call(&UPSTREAMS_GET, &[("id", upstream_id)], None, Query::new())
    }

    pub fn list_plugin_metadatas(&self) -> Result<Vec<Value>, ApiError> {
        self.inner.call_list(&PLUGIN_METADATA_LIST, &[], Query::new())
    }

    pub fn get_plugin_metadata(&self, plugin_name: &str) -> Result<Value, ApiError> {
        self.inner
            .call(&PLUGIN_METADATA_GET, &[("name", plugin_name)], None, Query::new())
    }

    pub fn reload_plugins(&self) -> Result<Value, ApiError> {
        self.inner.call(&PLUGINS_RELOAD, &[], None, Query::new())
    }

    /// Nodes currently known to the discovery module `service` (e.g. `eureka`).
    pub fn get_discovery_dump(&self, service: &str) -> Result<Value, ApiError> {
        self.inner
            .call(&DISCOVERY_DUMP, &[("service", service)], None, Query::new())
    }

    pub fn show_discovery_dump_file(&self, service: &str) -> Result<Value, ApiError> {
        self.inner
            .call(&DISCOVERY_DUMP_FILE, &[("service", service)], None, Query::new())
    }
}
