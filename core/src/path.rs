//! Path template substitution and query strings.
//!
//! Templates use `{name}` placeholders (`routes/{id}`,
//! `secrets/{manager}/{id}`). Every placeholder must be supplied and
//! every substituted value must be non-empty once surrounding slashes are
//! stripped, so a call can never silently collapse into a different
//! endpoint (`routes/` listing instead of fetching). Each `/`-separated
//! piece of a value is percent-encoded, so ids with spaces, `?` or `#`
//! reach the server as one path segment.

use url::form_urlencoded;

use crate::error::ApiError;

/// Substitute `params` into `template`.
///
/// The result never starts with `/`. Unused params are ignored.
pub fn resolve(template: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find(['{', '}']) {
        if rest.as_bytes()[open] == b'}' {
            return Err(unbalanced(template));
        }
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| unbalanced(template))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(unbalanced(template));
        }

        let value = params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| ApiError::MissingPathParam {
                name: name.to_string(),
                template: template.to_string(),
            })?;
        let value = value.trim_matches('/');
        if value.is_empty() {
            return Err(ApiError::InvalidRequest(format!(
                "path parameter `{name}` is empty"
            )));
        }
        if value.contains("//") {
            return Err(ApiError::InvalidRequest(format!(
                "path parameter `{name}` contains an empty segment"
            )));
        }
        let pieces: Vec<_> = value.split('/').map(urlencoding::encode).collect();
        out.push_str(&pieces.join("/"));
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    Ok(out.trim_start_matches('/').to_string())
}

fn unbalanced(template: &str) -> ApiError {
    ApiError::InvalidRequest(format!("malformed path template `{template}`"))
}

/// Join a normalized base URL and a resolved path with exactly one `/`.
pub fn join(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Ordered query-string pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Append `ttl=<n>` when a ttl is given.
    pub fn ttl(self, ttl: Option<u64>) -> Self {
        match ttl {
            Some(ttl) => self.with("ttl", ttl.to_string()),
            None => self,
        }
    }

    /// Append `key=value` when a value is given.
    pub fn optional(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// `pairs` first, then everything already in `self`.
    pub(crate) fn prepend(self, pairs: &[(&str, &str)]) -> Self {
        let mut merged: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        merged.extend(self.pairs);
        Self { pairs: merged }
    }

    /// Form-urlencoded query string without the leading `?`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// `url` with this query appended, or `url` unchanged when empty.
    pub(crate) fn apply(&self, url: String) -> String {
        if self.is_empty() {
            url
        } else {
            format!("{url}?{}", self.encode())
        }
    }
}
