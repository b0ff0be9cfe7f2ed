//! Static descriptors for the REST operations a client can perform.
//!
//! # Design
//! Each logical operation (`routes.get`, `plugins.reload`, ...) is one
//! `const Endpoint`: verb, path template, and what the call may carry.
//! A `Catalogue` groups the endpoints of one API surface so a single
//! dispatcher can serve both the Admin and the Control API.

use crate::http::HttpMethod;

/// One logical operation of an API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Dotted logical name, unique within a catalogue.
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path relative to the base URL, with `{placeholder}`s.
    pub path: &'static str,
    /// The call must carry a JSON body.
    pub body: bool,
    /// The call may carry a `ttl` query parameter.
    pub ttl: bool,
    /// Query pairs sent on every call, before caller-supplied ones.
    pub query: &'static [(&'static str, &'static str)],
    /// The response is a `{"node": {"nodes": [...]}}` envelope.
    pub list: bool,
}

impl Endpoint {
    const fn new(name: &'static str, method: HttpMethod, path: &'static str, body: bool) -> Self {
        Self {
            name,
            method,
            path,
            body,
            ttl: false,
            query: &[],
            list: false,
        }
    }

    /// GET returning the list envelope.
    pub const fn list(name: &'static str, path: &'static str) -> Self {
        Self {
            list: true,
            ..Self::new(name, HttpMethod::Get, path, false)
        }
    }

    pub const fn get(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Get, path, false)
    }

    /// A write carrying a JSON body.
    pub const fn write(name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self::new(name, method, path, true)
    }

    /// A write without a body (`plugins/reload`, `gc`).
    pub const fn action(name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self::new(name, method, path, false)
    }

    pub const fn delete(name: &'static str, path: &'static str) -> Self {
        Self::new(name, HttpMethod::Delete, path, false)
    }

    pub const fn with_ttl(self) -> Self {
        Self { ttl: true, ..self }
    }

    pub const fn with_query(self, query: &'static [(&'static str, &'static str)]) -> Self {
        Self { query, ..self }
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.path;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else { break };
            names.push(&after[..close]);
            rest = &after[close + 1..];
        }
        names
    }
}

/// The endpoints of one API surface.
#[derive(Debug)]
pub struct Catalogue {
    pub name: &'static str,
    pub endpoints: &'static [Endpoint],
}

impl Catalogue {
    pub fn get(&self, name: &str) -> Option<&'static Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, endpoint: &Endpoint) -> bool {
        self.endpoints.contains(endpoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Endpoint> {
        self.endpoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATCH_PATH: Endpoint =
        Endpoint::write("routes.patch_path", HttpMethod::Patch, "routes/{id}/{path}").with_ttl();

    #[test]
    fn constructors_set_flags() {
        let list = Endpoint::list("routes.list", "routes");
        assert!(list.list && !list.body && list.method == HttpMethod::Get);

        assert!(PATCH_PATH.body && PATCH_PATH.ttl && !PATCH_PATH.list);

        let reload = Endpoint::action("plugins.reload", HttpMethod::Put, "plugins/reload");
        assert!(!reload.body);

        let all = Endpoint::get("plugins.properties_all", "plugins").with_query(&[("all", "true")]);
        assert_eq!(all.query, &[("all", "true")]);
    }

    #[test]
    fn lists_placeholders_in_order() {
        assert_eq!(PATCH_PATH.placeholders(), vec!["id", "path"]);
        assert!(Endpoint::get("schema.get", "schema").placeholders().is_empty());
    }

    #[test]
    fn catalogue_lookup_by_name() {
        static ENDPOINTS: [Endpoint; 2] = [
            Endpoint::list("routes.list", "routes"),
            Endpoint::get("routes.get", "routes/{id}"),
        ];
        let catalogue = Catalogue {
            name: "test",
            endpoints: &ENDPOINTS,
        };
        assert_eq!(catalogue.get("routes.get").unwrap().path, "routes/{id}");
        assert!(catalogue.get("routes.delete").is_none());
        assert!(catalogue.contains(&ENDPOINTS[0]));
        assert_eq!(catalogue.iter().count(), 2);
    }
}
