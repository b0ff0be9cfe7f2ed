//! Typed client for the APISIX Admin API.
//!
//! Every method is one catalogue entry dispatched through
//! `ResourceClient`; see [`endpoints`] for the verb and path of each.
//! Bodies accept anything that serializes to JSON, so callers can pass
//! `serde_json::json!` values or their own structs.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::client::ResourceClient;
use crate::config::ClientConfig;
use crate::endpoint::{Catalogue, Endpoint};
use crate::error::ApiError;
use crate::path::Query;
use crate::transport::Transport;

/// Admin API endpoint descriptors.
pub mod endpoints {
    use super::Endpoint;
    use crate::http::HttpMethod::{Patch, Post, Put};

    pub const ROUTES_LIST: Endpoint = Endpoint::list("routes.list", "routes");
    pub const ROUTES_GET: Endpoint = Endpoint::get("routes.get", "routes/{id}");
    pub const ROUTES_CREATE: Endpoint = Endpoint::write("routes.create", Post, "routes").with_ttl();
    pub const ROUTES_PUT: Endpoint = Endpoint::write("routes.put", Put, "routes/{id}").with_ttl();
    pub const ROUTES_PATCH: Endpoint =
        Endpoint::write("routes.patch", Patch, "routes/{id}").with_ttl();
    pub const ROUTES_PATCH_PATH: Endpoint =
        Endpoint::write("routes.patch_path", Patch, "routes/{id}/{path}").with_ttl();
    pub const ROUTES_DELETE: Endpoint = Endpoint::delete("routes.delete", "routes/{id}");

    pub const SERVICES_LIST: Endpoint = Endpoint::list("services.list", "services");
    pub const SERVICES_GET: Endpoint = Endpoint::get("services.get", "services/{id}");
    pub const SERVICES_CREATE: Endpoint = Endpoint::write("services.create", Post, "services");
    pub const SERVICES_PUT: Endpoint = Endpoint::write("services.put", Put, "services/{id}");
    pub const SERVICES_PATCH: Endpoint = Endpoint::write("services.patch", Patch, "services/{id}");
    pub const SERVICES_PATCH_PATH: Endpoint =
        Endpoint::write("services.patch_path", Patch, "services/{id}/{path}");
    pub const SERVICES_DELETE: Endpoint = Endpoint::delete("services.delete", "services/{id}");

    pub const CONSUMERS_LIST: Endpoint = Endpoint::list("consumers.list", "consumers");
    pub const CONSUMERS_GET: Endpoint = Endpoint::get("consumers.get", "consumers/{username}");
    pub const CONSUMERS_CREATE: Endpoint = Endpoint::write("consumers.create", Post, "consumers");
    pub const CONSUMERS_PUT: Endpoint =
        Endpoint::write("consumers.put", Put, "consumers/{username}");
    pub const CONSUMERS_DELETE: Endpoint =
        Endpoint::delete("consumers.delete", "consumers/{username}");

    pub const CREDENTIALS_LIST: Endpoint =
        Endpoint::list("credentials.list", "consumers/{username}/credentials");
    pub const CREDENTIALS_GET: Endpoint = Endpoint::get(
        "credentials.get",
        "consumers/{username}/credentials/{credential_id}",
    );
    pub const CREDENTIALS_PUT: Endpoint = Endpoint::write(
        "credentials.put",
        Put,
        "consumers/{username}/credentials/{credential_id}",
    );
    pub const CREDENTIALS_DELETE: Endpoint = Endpoint::delete(
        "credentials.delete",
        "consumers/{username}/credentials/{credential_id}",
    );

    pub const UPSTREAMS_LIST: Endpoint = Endpoint::list("upstreams.list", "upstreams");
    pub const UPSTREAMS_GET: Endpoint = Endpoint::get("upstreams.get", "upstreams/{id}");
    pub const UPSTREAMS_CREATE: Endpoint = Endpoint::write("upstreams.create", Post, "upstreams");
    pub const UPSTREAMS_PUT: Endpoint = Endpoint::write("upstreams.put", Put, "upstreams/{id}");
    pub const UPSTREAMS_PATCH: Endpoint =
        Endpoint::write("upstreams.patch", Patch, "upstreams/{id}");
    pub const UPSTREAMS_PATCH_PATH: Endpoint =
        Endpoint::write("upstreams.patch_path", Patch, "upstreams/{id}/{path}");
    pub const UPSTREAMS_DELETE: Endpoint = Endpoint::delete("upstreams.delete", "upstreams/{id}");

    pub const SSL_LIST: Endpoint = Endpoint::list("ssl.list", "ssl");
    pub const SSL_GET: Endpoint = Endpoint::get("ssl.get", "ssl/{id}");
    pub const SSL_CREATE: Endpoint = Endpoint::write("ssl.create", Post, "ssl");
    pub const SSL_PUT: Endpoint = Endpoint::write("ssl.put", Put, "ssl/{id}");
    pub const SSL_DELETE: Endpoint = Endpoint::delete("ssl.delete", "ssl/{id}");

    pub const GLOBAL_RULES_LIST: Endpoint = Endpoint::list("global_rules.list", "global_rules");
    pub const GLOBAL_RULES_GET: Endpoint = Endpoint::get("global_rules.get", "global_rules/{id}");
    pub const GLOBAL_RULES_PUT: Endpoint =
        Endpoint::write("global_rules.put", Put, "global_rules/{id}");
    pub const GLOBAL_RULES_PATCH: Endpoint =
        Endpoint::write("global_rules.patch", Patch, "global_rules/{id}");
    pub const GLOBAL_RULES_PATCH_PATH: Endpoint =
        Endpoint::write("global_rules.patch_path", Patch, "global_rules/{id}/{path}");
    pub const GLOBAL_RULES_DELETE: Endpoint =
        Endpoint::delete("global_rules.delete", "global_rules/{id}");

    pub const CONSUMER_GROUPS_LIST: Endpoint =
        Endpoint::list("consumer_groups.list", "consumer_groups");
    pub const CONSUMER_GROUPS_GET: Endpoint =
        Endpoint::get("consumer_groups.get", "consumer_groups/{id}");
    pub const CONSUMER_GROUPS_PUT: Endpoint =
        Endpoint::write("consumer_groups.put", Put, "consumer_groups/{id}");
    pub const CONSUMER_GROUPS_PATCH: Endpoint =
        Endpoint::write("consumer_groups.patch", Patch, "consumer_groups/{id}");
    pub const CONSUMER_GROUPS_PATCH_PATH: Endpoint =
        Endpoint::write("consumer_groups.patch_path", Patch, "consumer_groups/{id}/{path}");
    pub const CONSUMER_GROUPS_DELETE: Endpoint =
        Endpoint::delete("consumer_groups.delete", "consumer_groups/{id}");

    pub const PLUGIN_CONFIGS_LIST: Endpoint =
        Endpoint::list("plugin_configs.list", "plugin_configs");
    pub const PLUGIN_CONFIGS_GET: Endpoint =
        Endpoint::get("plugin_configs.get", "plugin_configs/{id}");
    pub const PLUGIN_CONFIGS_PUT: Endpoint =
        Endpoint::write("plugin_configs.put", Put, "plugin_configs/{id}");
    pub const PLUGIN_CONFIGS_PATCH: Endpoint =
        Endpoint::write("plugin_configs.patch", Patch, "plugin_configs/{id}");
    pub const PLUGIN_CONFIGS_PATCH_PATH: Endpoint =
        Endpoint::write("plugin_configs.patch_path", Patch, "plugin_configs/{id}/{path}");
    pub const PLUGIN_CONFIGS_DELETE: Endpoint =
        Endpoint::delete("plugin_configs.delete", "plugin_configs/{id}");

    pub const PLUGIN_METADATA_GET: Endpoint =
        Endpoint::get("plugin_metadata.get", "plugin_metadata/{name}");
    pub const PLUGIN_METADATA_PUT: Endpoint =
        Endpoint::write("plugin_metadata.put", Put, "plugin_metadata/{name}");
    pub const PLUGIN_METADATA_DELETE: Endpoint =
        Endpoint::delete("plugin_metadata.delete", "plugin_metadata/{name}");

    pub const PLUGINS_LIST: Endpoint = Endpoint::list("plugins.list", "plugins/list");
    pub const PLUGINS_GET: Endpoint = Endpoint::get("plugins.get", "plugins/{name}");
    pub const PLUGINS_PROPERTIES: Endpoint = Endpoint::get("plugins.properties", "plugins/{name}");
    pub const PLUGINS_PROPERTIES_ALL: Endpoint =
        Endpoint::get("plugins.properties_all", "plugins").with_query(&[("all", "true")]);
    pub const PLUGINS_PROPERTIES_ALL_HTTP: Endpoint =
        Endpoint::get("plugins.properties_all_http", "plugins")
            .with_query(&[("all", "true"), ("subsystem", "http")]);
    pub const PLUGINS_PROPERTIES_ALL_STREAM: Endpoint =
        Endpoint::get("plugins.properties_all_stream", "plugins")
            .with_query(&[("all", "true"), ("subsystem", "stream")]);
    pub const PLUGINS_RELOAD: Endpoint = Endpoint::action("plugins.reload", Put, "plugins/reload");

    pub const STREAM_ROUTES_LIST: Endpoint = Endpoint::list("stream_routes.list", "stream_routes");
    pub const STREAM_ROUTES_GET: Endpoint =
        Endpoint::get("stream_routes.get", "stream_routes/{id}");
    pub const STREAM_ROUTES_CREATE: Endpoint =
        Endpoint::write("stream_routes.create", Post, "stream_routes");
    pub const STREAM_ROUTES_PUT: Endpoint =
        Endpoint::write("stream_routes.put", Put, "stream_routes/{id}");
    pub const STREAM_ROUTES_DELETE: Endpoint =
        Endpoint::delete("stream_routes.delete", "stream_routes/{id}");

    pub const SECRETS_LIST: Endpoint = Endpoint::list("secrets.list", "secrets");
    pub const SECRETS_GET: Endpoint = Endpoint::get("secrets.get", "secrets/{manager}/{id}");
    pub const SECRETS_PUT: Endpoint = Endpoint::write("secrets.put", Put, "secrets/{manager}/{id}");
    pub const SECRETS_PATCH: Endpoint =
        Endpoint::write("secrets.patch", Patch, "secrets/{manager}/{id}");
    pub const SECRETS_PATCH_PATH: Endpoint =
        Endpoint::write("secrets.patch_path", Patch, "secrets/{manager}/{id}/{path}");
    pub const SECRETS_DELETE: Endpoint =
        Endpoint::delete("secrets.delete", "secrets/{manager}/{id}");

    pub const PROTOS_LIST: Endpoint = Endpoint::list("protos.list", "protos");
    pub const PROTOS_GET: Endpoint = Endpoint::get("protos.get", "protos/{id}");
    pub const PROTOS_CREATE: Endpoint = Endpoint::write("protos.create", Post, "protos");
    pub const PROTOS_PUT: Endpoint = Endpoint::write("protos.put", Put, "protos/{id}");
    pub const PROTOS_DELETE: Endpoint = Endpoint::delete("protos.delete", "protos/{id}");

    pub const SCHEMA_VALIDATE: Endpoint =
        Endpoint::write("schema.validate", Post, "schema/validate/{resource}");

    pub(super) static ALL: [Endpoint; 80] = [
        ROUTES_LIST,
        ROUTES_GET,
        ROUTES_CREATE,
        ROUTES_PUT,
        ROUTES_PATCH,
        ROUTES_PATCH_PATH,
        ROUTES_DELETE,
        SERVICES_LIST,
        SERVICES_GET,
        SERVICES_CREATE,
        SERVICES_PUT,
        SERVICES_PATCH,
        SERVICES_PATCH_PATH,
        SERVICES_DELETE,
        CONSUMERS_LIST,
        CONSUMERS_GET,
        CONSUMERS_CREATE,
        CONSUMERS_PUT,
        CONSUMERS_DELETE,
        CREDENTIALS_LIST,
        CREDENTIALS_GET,
        CREDENTIALS_PUT,
        CREDENTIALS_DELETE,
        UPSTREAMS_LIST,
        UPSTREAMS_GET,
        UPSTREAMS_CREATE,
        UPSTREAMS_PUT,
        UPSTREAMS_PATCH,
        UPSTREAMS_PATCH_PATH,
        UPSTREAMS_DELETE,
        SSL_LIST,
        SSL_GET,
        SSL_CREATE,
        SSL_PUT,
        SSL_DELETE,
        GLOBAL_RULES_LIST,
        GLOBAL_RULES_GET,
        GLOBAL_RULES_PUT,
        GLOBAL_RULES_PATCH,
        GLOBAL_RULES_PATCH_PATH,
        GLOBAL_RULES_DELETE,
        CONSUMER_GROUPS_LIST,
        CONSUMER_GROUPS_GET,
        CONSUMER_GROUPS_PUT,
        CONSUMER_GROUPS_PATCH,
        CONSUMER_GROUPS_PATCH_PATH,
        CONSUMER_GROUPS_DELETE,
        PLUGIN_CONFIGS_LIST,
        PLUGIN_CONFIGS_GET,
        PLUGIN_CONFIGS_PUT,
        PLUGIN_CONFIGS_PATCH,
        PLUGIN_CONFIGS_PATCH_PATH,
        PLUGIN_CONFIGS_DELETE,
        PLUGIN_METADATA_GET,
        PLUGIN_METADATA_PUT,
        PLUGIN_METADATA_DELETE,
        PLUGINS_LIST,
        PLUGINS_GET,
        PLUGINS_PROPERTIES,
        PLUGINS_PROPERTIES_ALL,
        PLUGINS_PROPERTIES_ALL_HTTP,
        PLUGINS_PROPERTIES_ALL_STREAM,
        PLUGINS_RELOAD,
        STREAM_ROUTES_LIST,
        STREAM_ROUTES_GET,
        STREAM_ROUTES_CREATE,
        STREAM_ROUTES_PUT,
        STREAM_ROUTES_DELETE,
        SECRETS_LIST,
        SECRETS_GET,
        SECRETS_PUT,
        SECRETS_PATCH,
        SECRETS_PATCH_PATH,
        SECRETS_DELETE,
        PROTOS_LIST,
        PROTOS_GET,
        PROTOS_CREATE,
        PROTOS_PUT,
        PROTOS_DELETE,
        SCHEMA_VALIDATE,
    ];
}

/// The Admin API catalogue.
pub static ADMIN: Catalogue = Catalogue {
    name: "admin",
    endpoints: &endpoints::ALL,
};

use endpoints::*;

/// Client for the Admin API, mounted at e.g. `http://127.0.0.1:9180/apisix/admin`.
#[derive(Debug, Clone)]
pub struct AdminClient {
    inner: ResourceClient,
}

impl AdminClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig::new(base_url).with_api_key(api_key))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ResourceClient::new(config, &ADMIN)?,
        })
    }

    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            inner: ResourceClient::with_transport(config, &ADMIN, transport)?,
        })
    }

    /// The underlying dispatcher, for generic or by-name calls.
    pub fn resource_client(&self) -> &ResourceClient {
        &self.inner
    }

    fn list(&self, endpoint: &Endpoint, params: &[(&str, &str)]) -> Result<Vec<Value>, ApiError> {
        self.inner.call_list(endpoint, params, Query::new())
    }

    fn read(&self, endpoint: &Endpoint, params: &[(&str, &str)], query: Query) -> Result<Value, ApiError> {
        self.inner.call(endpoint, params, None, query)
    }

    fn write<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        params: &[(&str, &str)],
        body: &B,
        query: Query,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Serialization)?;
        self.inner.call(endpoint, params, Some(&body), query)
    }

    // --- routes ---

    pub fn list_routes(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&ROUTES_LIST, &[])
    }

    pub fn get_route(&self, route_id: &str) -> Result<Value, ApiError> {
        self.read(&ROUTES_GET, &[("id", route_id)], Query::new())
    }

    /// Creates a route; the server assigns the id.
    pub fn create_route<B: Serialize + ?Sized>(&self, route: &B, ttl: Option<u64>) -> Result<Value, ApiError> {
        self.write(&ROUTES_CREATE, &[], route, Query::new().ttl(ttl))
    }

    /// Creates or replaces the route with the given id.
    pub fn create_route_with_id<B: Serialize + ?Sized>(
        &self,
        route_id: &str,
        route: &B,
        ttl: Option<u64>,
    ) -> Result<Value, ApiError> {
        self.write(&ROUTES_PUT, &[("id", route_id)], route, Query::new().ttl(ttl))
    }

    /// Merges `patch` into the route. A `null` attribute deletes it.
    pub fn update_route<B: Serialize + ?Sized>(
        &self,
        route_id: &str,
        patch: &B,
        ttl: Option<u64>,
    ) -> Result<Value, ApiError> {
        self.write(&ROUTES_PATCH, &[("id", route_id)], patch, Query::new().ttl(ttl))
    }

    /// Replaces the attribute at `path` (e.g. `plugins`); other attributes
    /// are left unchanged.
    pub fn update_route_with_path<B: Serialize + ?Sized>(
        &self,
        route_id: &str,
        path: &str,
        value: &B,
        ttl: Option<u64>,
    ) -> Result<Value, ApiError> {
        self.write(
            &ROUTES_PATCH_PATH,
            &[("id", route_id), ("path", path)],
            value,
            Query::new().ttl(ttl),
        )
    }

    pub fn delete_route(&self, route_id: &str) -> Result<Value, ApiError> {
        self.read(&ROUTES_DELETE, &[("id", route_id)], Query::new())
    }

    // --- services ---

    pub fn list_services(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&SERVICES_LIST, &[])
    }

    pub fn get_service(&self, service_id: &str) -> Result<Value, ApiError> {
        self.read(&SERVICES_GET, &[("id", service_id)], Query::new())
    }

    pub fn create_service<B: Serialize + ?Sized>(&self, service: &B) -> Result<Value, ApiError> {
        self.write(&SERVICES_CREATE, &[], service, Query::new())
    }

    pub fn create_service_with_id<B: Serialize + ?Sized>(
        &self,
        service_id: &str,
        service: &B,
    ) -> Result<Value, ApiError> {
        self.write(&SERVICES_PUT, &[("id", service_id)], service, Query::new())
    }

    pub fn update_service<B: Serialize + ?Sized>(&self, service_id: &str, patch: &B) -> Result<Value, ApiError> {
        self.write(&SERVICES_PATCH, &[("id", service_id)], patch, Query::new())
    }

    pub fn update_service_with_path<B: Serialize + ?Sized>(
        &self,
        service_id: &str,
        path: &str,
        value: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &SERVICES_PATCH_PATH,
            &[("id", service_id), ("path", path)],
            value,
            Query::new(),
        )
    }

    pub fn delete_service(&self, service_id: &str) -> Result<Value, ApiError> {
        self.read(&SERVICES_DELETE, &[("id", service_id)], Query::new())
    }

    // --- consumers ---

    pub fn list_consumers(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&CONSUMERS_LIST, &[])
    }

    pub fn get_consumer(&self, username: &str) -> Result<Value, ApiError> {
        self.read(&CONSUMERS_GET, &[("username", username)], Query::new())
    }

    pub fn create_consumer<B: Serialize + ?Sized>(&self, consumer: &B) -> Result<Value, ApiError> {
        self.write(&CONSUMERS_CREATE, &[], consumer, Query::new())
    }

    pub fn update_consumer<B: Serialize + ?Sized>(&self, username: &str, consumer: &B) -> Result<Value, ApiError> {
        self.write(&CONSUMERS_PUT, &[("username", username)], consumer, Query::new())
    }

    pub fn delete_consumer(&self, username: &str) -> Result<Value, ApiError> {
        self.read(&CONSUMERS_DELETE, &[("username", username)], Query::new())
    }

    // --- consumer credentials ---

    pub fn list_consumer_credentials(&self, username: &str) -> Result<Vec<Value>, ApiError> {
        self.list(&CREDENTIALS_LIST, &[("username", username)])
    }

    pub fn get_consumer_credential(&self, username: &str, credential_id: &str) -> Result<Value, ApiError> {
        self.read(
            &CREDENTIALS_GET,
            &[("username", username), ("credential_id", credential_id)],
            Query::new(),
        )
    }

    pub fn create_or_update_consumer_credential<B: Serialize + ?Sized>(
        &self,
        username: &str,
        credential_id: &str,
        credential: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &CREDENTIALS_PUT,
            &[("username", username), ("credential_id", credential_id)],
            credential,
            Query::new(),
        )
    }

    pub fn delete_consumer_credential(&self, username: &str, credential_id: &str) -> Result<Value, ApiError> {
        self.read(
            &CREDENTIALS_DELETE,
            &[("username", username), ("credential_id", credential_id)],
            Query::new(),
        )
    }

    // --- upstreams ---

    pub fn list_upstreams(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&UPSTREAMS_LIST, &[])
    }

    pub fn get_upstream(&self, upstream_id: &str) -> Result<Value, ApiError> {
        self.read(&UPSTREAMS_GET, &[("id", upstream_id)], Query::new())
    }

    pub fn create_upstream<B: Serialize + ?Sized>(&self, upstream: &B) -> Result<Value, ApiError> {
        self.write(&UPSTREAMS_CREATE, &[], upstream, Query::new())
    }

    pub fn create_upstream_with_id<B: Serialize + ?Sized>(
        &self,
        upstream_id: &str,
        upstream: &B,
    ) -> Result<Value, ApiError> {
        self.write(&UPSTREAMS_PUT, &[("id", upstream_id)], upstream, Query::new())
    }

    pub fn update_upstream<B: Serialize + ?Sized>(&self, upstream_id: &str, patch: &B) -> Result<Value, ApiError> {
        self.write(&UPSTREAMS_PATCH, &[("id", upstream_id)], patch, Query::new())
    }

    pub fn update_upstream_with_path<B: Serialize + ?Sized>(
        &self,
        upstream_id: &str,
        path: &str,
        value: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &UPSTREAMS_PATCH_PATH,
            &[("id", upstream_id), ("path", path)],
            value,
            Query::new(),
        )
    }

    pub fn delete_upstream(&self, upstream_id: &str) -> Result<Value, ApiError> {
        self.read(&UPSTREAMS_DELETE, &[("id", upstream_id)], Query::new())
    }

    // --- ssl ---

    pub fn list_ssl(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&SSL_LIST, &[])
    }

    pub fn get_ssl(&self, ssl_id: &str) -> Result<Value, ApiError> {
        self.read(&SSL_GET, &[("id", ssl_id)], Query::new())
    }

    pub fn create_ssl<B: Serialize + ?Sized>(&self, ssl: &B) -> Result<Value, ApiError> {
        self.write(&SSL_CREATE, &[], ssl, Query::new())
    }

    pub fn update_ssl<B: Serialize + ?Sized>(&self, ssl_id: &str, ssl: &B) -> Result<Value, ApiError> {
        self.write(&SSL_PUT, &[("id", ssl_id)], ssl, Query::new())
    }

    pub fn delete_ssl(&self, ssl_id: &str) -> Result<Value, ApiError> {
        self.read(&SSL_DELETE, &[("id", ssl_id)], Query::new())
    }

    // --- global rules ---

    pub fn list_global_rules(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&GLOBAL_RULES_LIST, &[])
    }

    pub fn get_global_rule(&self, rule_id: &str) -> Result<Value, ApiError> {
        self.read(&GLOBAL_RULES_GET, &[("id", rule_id)], Query::new())
    }

    pub fn create_global_rule_with_id<B: Serialize + ?Sized>(
        &self,
        rule_id: &str,
        rule: &B,
    ) -> Result<Value, ApiError> {
        self.write(&GLOBAL_RULES_PUT, &[("id", rule_id)], rule, Query::new())
    }

    pub fn update_global_rule<B: Serialize + ?Sized>(&self, rule_id: &str, patch: &B) -> Result<Value, ApiError> {
        self.write(&GLOBAL_RULES_PATCH, &[("id", rule_id)], patch, Query::new())
    }

    pub fn update_global_rule_with_path<B: Serialize + ?Sized>(
        &self,
        rule_id: &str,
        path: &str,
        value: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &GLOBAL_RULES_PATCH_PATH,
            &[("id", rule_id), ("path", path)],
            value,
            Query::new(),
        )
    }

    pub fn delete_global_rule(&self, rule_id: &str) -> Result<Value, ApiError> {
        self.read(&GLOBAL_RULES_DELETE, &[("id", rule_id)], Query::new())
    }

    // --- consumer groups ---

    pub fn list_consumer_groups(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&CONSUMER_GROUPS_LIST, &[])
    }

    pub fn get_consumer_group(&self, group_id: &str) -> Result<Value, ApiError> {
        self.read(&CONSUMER_GROUPS_GET, &[("id", group_id)], Query::new())
    }

    pub fn create_consumer_group_with_id<B: Serialize + ?Sized>(
        &self,
        group_id: &str,
        group: &B,
    ) -> Result<Value, ApiError> {
        self.write(&CONSUMER_GROUPS_PUT, &[("id", group_id)], group, Query::new())
    }

    pub fn update_consumer_group<B: Serialize + ?Sized>(&self, group_id: &str, patch: &B) -> Result<Value, ApiError> {
        self.write(&CONSUMER_GROUPS_PATCH, &[("id", group_id)], patch, Query::new())
    }

    pub fn update_consumer_group_with_path<B: Serialize + ?Sized>(
        &self,
        group_id: &str,
        path: &str,
        value: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &CONSUMER_GROUPS_PATCH_PATH,
            &[("id", group_id), ("path", path)],
            value,
            Query::new(),
        )
    }

    pub fn delete_consumer_group(&self, group_id: &str) -> Result<Value, ApiError> {
        self.read(&CONSUMER_GROUPS_DELETE, &[("id", group_id)], Query::new())
    }

    // --- plugin configs ---

    pub fn list_plugin_configs(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&PLUGIN_CONFIGS_LIST, &[])
    }

    pub fn get_plugin_config(&self, config_id: &str) -> Result<Value, ApiError> {
        self.read(&PLUGIN_CONFIGS_GET, &[("id", config_id)], Query::new())
    }

    pub fn create_plugin_config_with_id<B: Serialize + ?Sized>(
        &self,
        config_id: &str,
        config: &B,
    ) -> Result<Value, ApiError> {
        self.write(&PLUGIN_CONFIGS_PUT, &[("id", config_id)], config, Query::new())
    }

    pub fn update_plugin_config<B: Serialize + ?Sized>(&self, config_id: &str, patch: &B) -> Result<Value, ApiError> {
        self.write(&PLUGIN_CONFIGS_PATCH, &[("id", config_id)], patch, Query::new())
    }

    pub fn update_plugin_config_with_path<B: Serialize + ?Sized>(
        &self,
        config_id: &str,
        path: &str,
        value: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &PLUGIN_CONFIGS_PATCH_PATH,
            &[("id", config_id), ("path", path)],
            value,
            Query::new(),
        )
    }

    pub fn delete_plugin_config(&self, config_id: &str) -> Result<Value, ApiError> {
        self.read(&PLUGIN_CONFIGS_DELETE, &[("id", config_id)], Query::new())
    }

    // --- plugin metadata ---

    pub fn get_plugin_metadata(&self, plugin_name: &str) -> Result<Value, ApiError> {
        self.read(&PLUGIN_METADATA_GET, &[("name", plugin_name)], Query::new())
    }

    pub fn create_plugin_metadata<B: Serialize + ?Sized>(
        &self,
        plugin_name: &str,
        metadata: &B,
    ) -> Result<Value, ApiError> {
        self.write(&PLUGIN_METADATA_PUT, &[("name", plugin_name)], metadata, Query::new())
    }

    pub fn delete_plugin_metadata(&self, plugin_name: &str) -> Result<Value, ApiError> {
        self.read(&PLUGIN_METADATA_DELETE, &[("name", plugin_name)], Query::new())
    }

    // --- plugins ---

    pub fn list_plugins(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&PLUGINS_LIST, &[])
    }

    pub fn get_plugin(&self, plugin_name: &str) -> Result<Value, ApiError> {
        self.read(&PLUGINS_GET, &[("name", plugin_name)], Query::new())
    }

    /// Properties of one plugin, optionally restricted to a subsystem
    /// (`http` or `stream`).
    pub fn get_plugin_properties(&self, plugin_name: &str, subsystem: Option<&str>) -> Result<Value, ApiError> {
        self.read(
            &PLUGINS_PROPERTIES,
            &[("name", plugin_name)],
            Query::new().optional("subsystem", subsystem),
        )
    }

    pub fn get_all_plugins_properties(&self) -> Result<Value, ApiError> {
        self.read(&PLUGINS_PROPERTIES_ALL, &[], Query::new())
    }

    pub fn get_all_http_plugins_properties(&self) -> Result<Value, ApiError> {
        self.read(&PLUGINS_PROPERTIES_ALL_HTTP, &[], Query::new())
    }

    pub fn get_all_stream_plugins_properties(&self) -> Result<Value, ApiError> {
        self.read(&PLUGINS_PROPERTIES_ALL_STREAM, &[], Query::new())
    }

    pub fn reload_plugins(&self) -> Result<Value, ApiError> {
        self.read(&PLUGINS_RELOAD, &[], Query::new())
    }

    // --- stream routes ---

    pub fn list_stream_routes(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&STREAM_ROUTES_LIST, &[])
    }

    pub fn get_stream_route(&self, route_id: &str) -> Result<Value, ApiError> {
        self.read(&STREAM_ROUTES_GET, &[("id", route_id)], Query::new())
    }

    pub fn create_stream_route<B: Serialize + ?Sized>(&self, route: &B) -> Result<Value, ApiError> {
        self.write(&STREAM_ROUTES_CREATE, &[], route, Query::new())
    }

    pub fn create_stream_route_with_id<B: Serialize + ?Sized>(
        &self,
        route_id: &str,
        route: &B,
    ) -> Result<Value, ApiError> {
        self.write(&STREAM_ROUTES_PUT, &[("id", route_id)], route, Query::new())
    }

    pub fn delete_stream_route(&self, route_id: &str) -> Result<Value, ApiError> {
        self.read(&STREAM_ROUTES_DELETE, &[("id", route_id)], Query::new())
    }

    // --- secrets ---

    pub fn list_secrets(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&SECRETS_LIST, &[])
    }

    pub fn get_secret(&self, manager: &str, secret_id: &str) -> Result<Value, ApiError> {
        self.read(&SECRETS_GET, &[("manager", manager), ("id", secret_id)], Query::new())
    }

    /// Creates or replaces the secret `secret_id` of `manager` (e.g. `vault`).
    pub fn create_secret<B: Serialize + ?Sized>(
        &self,
        manager: &str,
        secret_id: &str,
        secret: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &SECRETS_PUT,
            &[("manager", manager), ("id", secret_id)],
            secret,
            Query::new(),
        )
    }

    pub fn update_secret<B: Serialize + ?Sized>(
        &self,
        manager: &str,
        secret_id: &str,
        patch: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &SECRETS_PATCH,
            &[("manager", manager), ("id", secret_id)],
            patch,
            Query::new(),
        )
    }

    pub fn update_secret_with_path<B: Serialize + ?Sized>(
        &self,
        manager: &str,
        secret_id: &str,
        path: &str,
        value: &B,
    ) -> Result<Value, ApiError> {
        self.write(
            &SECRETS_PATCH_PATH,
            &[("manager", manager), ("id", secret_id), ("path", path)],
            value,
            Query::new(),
        )
    }

    pub fn delete_secret(&self, manager: &str, secret_id: &str) -> Result<Value, ApiError> {
        self.read(&SECRETS_DELETE, &[("manager", manager), ("id", secret_id)], Query::new())
    }

    // --- protos ---

    pub fn list_protos(&self) -> Result<Vec<Value>, ApiError> {
        self.list(&PROTOS_LIST, &[])
    }

    pub fn get_proto(&self, proto_id: &str) -> Result<Value, ApiError> {
        self.read(&PROTOS_GET, &[("id", proto_id)], Query::new())
    }

    pub fn create_proto<B: Serialize + ?Sized>(&self, proto: &B) -> Result<Value, ApiError> {
        self.write(&PROTOS_CREATE, &[], proto, Query::new())
    }

    pub fn create_proto_with_id<B: Serialize + ?Sized>(&self, proto_id: &str, proto: &B) -> Result<Value, ApiError> {
        self.write(&PROTOS_PUT, &[("id", proto_id)], proto, Query::new())
    }

    pub fn delete_proto(&self, proto_id: &str) -> Result<Value, ApiError> {
        self.read(&PROTOS_DELETE, &[("id", proto_id)], Query::new())
    }

    // --- schema validation ---

    /// Validates `config` against the schema of `resource` (`routes`,
    /// `upstreams`, ...) without storing it.
    pub fn validate_resource_schema<B: Serialize + ?Sized>(
        &self,
        resource: &str,
        config: &B,
    ) -> Result<Value, ApiError> {
        self.write(&SCHEMA_VALIDATE, &[("resource", resource)], config, Query::new())
    }
}
